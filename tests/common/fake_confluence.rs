//! Fake Confluence API client for testing
//!
//! Keeps pages, attachments and labels in memory and records every call so
//! command handlers can be exercised without a server.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use minimal_confluence::{AttachmentFile, Bunch, ConfluenceApi, Error, Result};
use serde_json::json;

use crate::common::fixtures;

#[derive(Default)]
struct State {
  pages: HashMap<String, Bunch>,
  attachments: HashMap<String, Vec<Bunch>>,
  labels: HashMap<String, Vec<String>>,
  next_id: u64,
}

/// A fake Confluence client backed by in-memory maps
pub struct FakeConfluenceClient {
  state: Mutex<State>,
  calls: Mutex<Vec<String>>,
}

impl FakeConfluenceClient {
  /// Create a new fake client with no pages
  pub fn new() -> Self {
    Self {
      state: Mutex::new(State {
        next_id: 900_000,
        ..State::default()
      }),
      calls: Mutex::new(Vec::new()),
    }
  }

  /// Create a fake client holding the sample page and its diagram attachment
  pub fn with_sample_pages() -> Self {
    let client = Self::new();
    client.add_page(Bunch::from(fixtures::sample_page_response()));

    let attachment = fixtures::sample_attachments_response()["results"][0].clone();
    client.add_attachment("123456", Bunch::from(attachment));
    client
  }

  /// Add a page keyed by its `id`
  pub fn add_page(&self, page: Bunch) {
    let id = page["id"].as_id().unwrap_or_default();
    self.state.lock().unwrap().pages.insert(id, page);
  }

  pub fn add_attachment(&self, page_id: &str, attachment: Bunch) {
    self
      .state
      .lock()
      .unwrap()
      .attachments
      .entry(page_id.to_string())
      .or_default()
      .push(attachment);
  }

  pub fn page(&self, page_id: &str) -> Option<Bunch> {
    self.state.lock().unwrap().pages.get(page_id).cloned()
  }

  pub fn attachments(&self, page_id: &str) -> Vec<Bunch> {
    self
      .state
      .lock()
      .unwrap()
      .attachments
      .get(page_id)
      .cloned()
      .unwrap_or_default()
  }

  pub fn labels(&self, page_id: &str) -> Vec<String> {
    self
      .state
      .lock()
      .unwrap()
      .labels
      .get(page_id)
      .cloned()
      .unwrap_or_default()
  }

  /// Names of the trait methods called so far, in order
  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: &str) {
    self.calls.lock().unwrap().push(call.to_string());
  }

  fn not_found(what: String) -> Error {
    Error::Api {
      status: reqwest::StatusCode::NOT_FOUND,
      body: what,
    }
  }
}

impl Default for FakeConfluenceClient {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ConfluenceApi for FakeConfluenceClient {
  async fn get_page(
    &self,
    title: Option<&str>,
    space_id: Option<&str>,
    page_id: Option<&str>,
  ) -> Result<Option<Bunch>> {
    self.record("get_page");
    let state = self.state.lock().unwrap();

    if let Some(page_id) = page_id {
      return state
        .pages
        .get(page_id)
        .cloned()
        .map(Some)
        .ok_or_else(|| Self::not_found(format!("page {page_id}")));
    }

    let title = title.ok_or_else(|| Error::Config("at least one of title or page_id must be given".to_string()))?;
    Ok(
      state
        .pages
        .values()
        .find(|page| {
          page["title"].as_str() == Some(title)
            && space_id.is_none_or(|space| page["spaceId"].as_str() == Some(space))
        })
        .cloned(),
    )
  }

  async fn create_page(
    &self,
    space: &str,
    title: &str,
    body: &str,
    parent_id: Option<&str>,
    _update_message: Option<&str>,
    _labels: Option<&[String]>,
  ) -> Result<Bunch> {
    self.record("create_page");
    let mut state = self.state.lock().unwrap();
    state.next_id += 1;
    let id = state.next_id.to_string();

    let page = Bunch::from(json!({
      "id": id,
      "status": "current",
      "title": title,
      "spaceId": space,
      "parentId": parent_id,
      "version": { "number": 1, "message": "", "minorEdit": false },
      "body": { "storage": { "representation": "storage", "value": body } },
      "ancestors": parent_id.map(|parent| vec![json!({ "id": parent })]).unwrap_or_default(),
      "_links": {
        "base": "https://example.atlassian.net/wiki",
        "webui": format!("/spaces/{space}/pages/{id}")
      }
    }));
    state.pages.insert(id, page.clone());
    Ok(page)
  }

  async fn update_page(
    &self,
    page: &Bunch,
    body: &str,
    parent_id: Option<&str>,
    update_message: Option<&str>,
    labels: Option<&[String]>,
    minor_edit: bool,
  ) -> Result<Bunch> {
    self.record("update_page");
    let id = page.require_id("id")?;
    let number = page.require_i64("version.number")?;

    let mut value = page.to_value();
    value["body"] = json!({ "storage": { "representation": "storage", "value": body } });
    value["version"] = json!({
      "number": number + 1,
      "message": update_message.unwrap_or_default(),
      "minorEdit": minor_edit
    });
    if let Some(parent) = parent_id {
      value["parentId"] = json!(parent);
    }

    let mut state = self.state.lock().unwrap();
    if let Some(labels) = labels {
      state.labels.entry(id.clone()).or_default().extend(labels.iter().cloned());
    }
    let updated = Bunch::from(value);
    state.pages.insert(id, updated.clone());
    Ok(updated)
  }

  async fn get_attachment(&self, page: &Bunch, name: &str) -> Result<Option<Bunch>> {
    self.record("get_attachment");
    let id = page.require_id("id")?;
    let state = self.state.lock().unwrap();
    Ok(
      state
        .attachments
        .get(&id)
        .and_then(|attachments| attachments.iter().find(|a| a["title"].as_str() == Some(name)))
        .cloned(),
    )
  }

  async fn update_attachment(
    &self,
    page: &Bunch,
    file: &AttachmentFile,
    existing_attachment: &Bunch,
    message: &str,
  ) -> Result<Bunch> {
    self.record("update_attachment");
    let page_id = page.require_id("id")?;
    let attachment_id = existing_attachment.require_id("id")?;

    let mut state = self.state.lock().unwrap();
    let attachment = state
      .attachments
      .get_mut(&page_id)
      .and_then(|attachments| {
        attachments
          .iter_mut()
          .find(|a| a["id"].as_id().as_deref() == Some(attachment_id.as_str()))
      })
      .ok_or_else(|| Self::not_found(format!("attachment {attachment_id}")))?;

    let version = attachment.path("version.number").and_then(Bunch::as_i64).unwrap_or(1);
    let mut value = attachment.to_value();
    value["version"] = json!({ "number": version + 1 });
    value["fileSize"] = json!(file.content.len());
    value["comment"] = json!(message);
    *attachment = Bunch::from(value);
    Ok(attachment.clone())
  }

  async fn create_attachment(&self, page: &Bunch, file: &AttachmentFile, message: &str) -> Result<Bunch> {
    self.record("create_attachment");
    let page_id = page.require_id("id")?;

    let mut state = self.state.lock().unwrap();
    state.next_id += 1;
    let attachment = Bunch::from(json!({
      "id": format!("att{}", state.next_id),
      "title": file.file_name,
      "mediaType": file.mime_type,
      "fileSize": file.content.len(),
      "comment": message,
      "version": { "number": 1 }
    }));
    state.attachments.entry(page_id).or_default().push(attachment.clone());
    Ok(Bunch::from(json!({ "results": [attachment.to_value()], "size": 1 })))
  }

  async fn add_labels(&self, page: &Bunch, labels: &[String]) -> Result<Bunch> {
    self.record("add_labels");
    let page_id = page.require_id("id")?;
    let mut state = self.state.lock().unwrap();
    let stored = state.labels.entry(page_id).or_default();
    stored.extend(labels.iter().cloned());

    let results: Vec<_> = stored
      .iter()
      .map(|name| json!({ "name": name, "prefix": "global" }))
      .collect();
    Ok(Bunch::from(json!({ "results": results })))
  }

  async fn get_space(&self, space: &str, additional_expansions: Option<&[String]>) -> Result<Bunch> {
    self.record("get_space");
    let mut value = fixtures::sample_space_response();
    value["id"] = json!(space);
    if let Some(expansions) = additional_expansions {
      value["expanded"] = json!(expansions);
    }
    Ok(Bunch::from(value))
  }

  async fn get_page_ancestors(&self, page_id: Option<&str>) -> Result<Vec<Bunch>> {
    self.record("get_page_ancestors");
    let page_id = page_id.ok_or_else(|| Error::Config("page_id is required".to_string()))?;
    let page = self.page(page_id).ok_or_else(|| Self::not_found(format!("page {page_id}")))?;
    Ok(page["ancestors"].as_array().map(<[Bunch]>::to_vec).unwrap_or_default())
  }

  async fn get_page_labels(&self, page_id: Option<&str>) -> Result<Vec<Bunch>> {
    self.record("get_page_labels");
    let page_id = page_id.ok_or_else(|| Error::Config("page_id is required".to_string()))?;
    Ok(
      self
        .labels(page_id)
        .into_iter()
        .map(|name| Bunch::from(json!({ "name": name, "prefix": "global" })))
        .collect(),
    )
  }
}
