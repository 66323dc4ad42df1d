//! File content uploaded as a page attachment.

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::{Error, Result};

/// A named blob ready to be sent as the `file` part of an attachment upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentFile {
  pub file_name: String,
  pub content: Vec<u8>,
  pub mime_type: Option<String>,
}

impl AttachmentFile {
  pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
    Self {
      file_name: file_name.into(),
      content: content.into(),
      mime_type: None,
    }
  }

  #[must_use]
  pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
    self.mime_type = Some(mime_type.into());
    self
  }

  /// Read a file from disk, naming the attachment after the file.
  ///
  /// # Errors
  /// [`Error::Io`] when the file cannot be read, [`Error::Config`] when the
  /// path has no file name.
  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .ok_or_else(|| Error::config(format!("attachment path {} has no file name", path.display())))?;

    let content = tokio::fs::read(path).await?;
    Ok(Self::new(file_name, content))
  }

  /// Build a fresh multipart part. Parts are consumed by the request, so a
  /// new one is built for every attempt.
  pub(crate) fn to_part(&self) -> Result<Part> {
    let part = Part::bytes(self.content.clone()).file_name(self.file_name.clone());
    match &self.mime_type {
      Some(mime) => part
        .mime_str(mime)
        .map_err(|e| Error::config(format!("invalid MIME type {mime:?} for {}: {e}", self.file_name))),
      None => Ok(part),
    }
  }
}
