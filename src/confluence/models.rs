//! Request bodies sent to the Confluence REST API.
//!
//! Field order matches the order in which the API documents them, which is
//! also the order they appear on the wire.

use serde::Serialize;

use crate::bunch::Bunch;
use crate::error::{Error, Result};

/// Page status used for every create and update.
pub const STATUS_CURRENT: &str = "current";

/// Label prefix/type for labels visible to everyone.
pub const GLOBAL_LABEL: &str = "global";

/// Page body in Confluence storage format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageBody<'a> {
  pub representation: &'static str,
  pub value: &'a str,
}

impl<'a> StorageBody<'a> {
  pub fn new(value: &'a str) -> Self {
    Self {
      representation: "storage",
      value,
    }
  }
}

/// Body of `POST api/v2/pages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest<'a> {
  pub title: &'a str,
  pub space_id: &'a str,
  pub status: &'static str,
  pub body: StorageBody<'a>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub parent_id: Option<&'a str>,
}

impl<'a> CreatePageRequest<'a> {
  pub fn new(space: &'a str, title: &'a str, body: &'a str, parent_id: Option<&'a str>) -> Self {
    Self {
      title,
      space_id: space,
      status: STATUS_CURRENT,
      body: StorageBody::new(body),
      parent_id,
    }
  }
}

/// Version block of a page update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionUpdate<'a> {
  pub number: i64,
  pub message: &'a str,
  pub minor_edit: bool,
}

/// Ancestor reference; the update endpoint expects a numeric id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AncestorRef {
  pub id: u64,
}

/// Label attached through page metadata on update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataLabel<'a> {
  pub name: &'a str,
  pub prefix: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata<'a> {
  pub labels: Vec<MetadataLabel<'a>>,
}

/// Body of `PUT api/v2/pages/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePageRequest<'a> {
  /// Id copied verbatim from the existing page.
  pub id: &'a Bunch,
  pub status: &'static str,
  pub title: &'a str,
  pub body: StorageBody<'a>,
  pub version: VersionUpdate<'a>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ancestors: Option<Vec<AncestorRef>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub metadata: Option<PageMetadata<'a>>,
}

/// Inputs of a page update besides the existing page itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageUpdate<'a> {
  pub body: &'a str,
  pub parent_id: Option<&'a str>,
  pub update_message: Option<&'a str>,
  pub labels: Option<&'a [String]>,
  pub minor_edit: bool,
}

impl<'a> UpdatePageRequest<'a> {
  /// Build an update from the page as last fetched.
  ///
  /// # Errors
  /// [`Error::MissingField`] when the page lacks `id`, `title` or
  /// `version.number`; [`Error::Config`] when `parent_id` is not numeric.
  pub fn from_page(page: &'a Bunch, update: PageUpdate<'a>) -> Result<Self> {
    let id = page.require("id")?;
    let title = page.require_str("title")?;
    let number = page
      .require_i64("version.number")?
      .checked_add(1)
      .ok_or_else(|| Error::config("version number overflow"))?;

    let ancestors = update
      .parent_id
      .map(|parent| parse_page_id(parent).map(|id| vec![AncestorRef { id }]))
      .transpose()?;

    let metadata = update.labels.map(|labels| PageMetadata {
      labels: labels
        .iter()
        .map(|name| MetadataLabel {
          name,
          prefix: GLOBAL_LABEL,
        })
        .collect(),
    });

    Ok(Self {
      id,
      status: STATUS_CURRENT,
      title,
      body: StorageBody::new(update.body),
      version: VersionUpdate {
        number,
        message: update.update_message.unwrap_or_default(),
        minor_edit: update.minor_edit,
      },
      ancestors,
      metadata,
    })
  }
}

/// Label record posted to a page's label collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord<'a> {
  pub name: &'a str,
  #[serde(rename = "type")]
  pub label_type: &'static str,
}

/// Global label records for `add_labels`.
pub fn label_records(labels: &[String]) -> Vec<LabelRecord<'_>> {
  labels
    .iter()
    .map(|name| LabelRecord {
      name,
      label_type: GLOBAL_LABEL,
    })
    .collect()
}

/// Coerce a textual page id into the integer form some endpoints expect.
///
/// # Errors
/// [`Error::Config`] when the text is not a non-negative integer.
pub fn parse_page_id(id: &str) -> Result<u64> {
  id.trim()
    .parse()
    .map_err(|_| Error::config(format!("page id must be numeric, got {id:?}")))
}
