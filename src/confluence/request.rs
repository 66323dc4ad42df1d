//! Description of a single API call, replayable across retry attempts.

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;
use serde_json::Value;

use super::attachment::AttachmentFile;
use crate::error::Result;

/// Header that disables the XSRF check on attachment endpoints.
pub const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";

/// One multipart form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
  Text { name: &'static str, value: String },
  File { name: &'static str, file: AttachmentFile },
}

/// Method, path, and options for one call through the client's request helper.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  /// Path relative to the configured host, without a leading `/`.
  pub path: String,
  pub query: Vec<(String, String)>,
  pub headers: Vec<(&'static str, String)>,
  pub json: Option<Value>,
  pub form: Option<Vec<FormField>>,
}

impl ApiRequest {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      query: Vec::new(),
      headers: vec![("Accept", "application/json".to_string())],
      json: None,
      form: None,
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(Method::GET, path)
  }

  pub fn post(path: impl Into<String>) -> Self {
    Self::new(Method::POST, path)
  }

  pub fn put(path: impl Into<String>) -> Self {
    Self::new(Method::PUT, path)
  }

  #[must_use]
  pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.query.push((key.into(), value.into()));
    self
  }

  /// Set a header, replacing any earlier value with the same name.
  #[must_use]
  pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
    self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    self.headers.push((name, value.into()));
    self
  }

  /// Attach a JSON body.
  pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
    self.json = Some(serde_json::to_value(body)?);
    Ok(self)
  }

  #[must_use]
  pub fn form(mut self, fields: Vec<FormField>) -> Self {
    self.form = Some(fields);
    self
  }

  /// Build the multipart form for one attempt.
  pub(crate) fn build_form(fields: &[FormField]) -> Result<Form> {
    fields.iter().try_fold(Form::new(), |form, field| {
      Ok(match field {
        FormField::Text { name, value } => form.text(*name, value.clone()),
        FormField::File { name, file } => form.part(*name, file.to_part()?),
      })
    })
  }
}

/// Form fields for an attachment upload: the file, plus a comment only when
/// the message is non-empty.
pub fn attachment_fields(file: &AttachmentFile, message: &str) -> Vec<FormField> {
  let mut fields = vec![FormField::File {
    name: "file",
    file: file.clone(),
  }];
  if !message.is_empty() {
    fields.push(FormField::Text {
      name: "comment",
      value: message.to_string(),
    });
  }
  fields
}
