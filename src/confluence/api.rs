//! Trait definitions for interacting with Confluence.

use async_trait::async_trait;

use super::attachment::AttachmentFile;
use super::url;
use crate::bunch::Bunch;
use crate::error::Result;

/// Confluence operations (enables command handlers to be written against any
/// implementation).
///
/// Page references passed in are the [`Bunch`] values returned by earlier
/// calls; each operation documents the fields it reads.
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
  /// Fetch a page.
  ///
  /// # Arguments
  /// * `title` - Page title to search for when no id is given.
  /// * `space_id` - Restricts the title search to one space.
  /// * `page_id` - Direct lookup; takes precedence over `title`.
  ///
  /// # Returns
  /// The full page, or `None` when a title search finds nothing.
  ///
  /// # Errors
  /// [`Error::Config`](crate::Error::Config) when neither `title` nor
  /// `page_id` is given.
  async fn get_page(&self, title: Option<&str>, space_id: Option<&str>, page_id: Option<&str>)
  -> Result<Option<Bunch>>;

  /// Create a page in a space.
  ///
  /// `update_message` and `labels` are accepted for symmetry with
  /// [`ConfluenceApi::update_page`] but the create endpoint has no place for
  /// them; they are not sent.
  async fn create_page(
    &self,
    space: &str,
    title: &str,
    body: &str,
    parent_id: Option<&str>,
    update_message: Option<&str>,
    labels: Option<&[String]>,
  ) -> Result<Bunch>;

  /// Replace a page's body, bumping its version by one.
  ///
  /// Reads `id`, `title` and `version.number` from `page`.
  async fn update_page(
    &self,
    page: &Bunch,
    body: &str,
    parent_id: Option<&str>,
    update_message: Option<&str>,
    labels: Option<&[String]>,
    minor_edit: bool,
  ) -> Result<Bunch>;

  /// First attachment on `page` named `name`, if any.
  async fn get_attachment(&self, page: &Bunch, name: &str) -> Result<Option<Bunch>>;

  /// Upload new content for an existing attachment.
  async fn update_attachment(
    &self,
    page: &Bunch,
    file: &AttachmentFile,
    existing_attachment: &Bunch,
    message: &str,
  ) -> Result<Bunch>;

  /// Upload a new attachment, allowing duplicate file names.
  async fn create_attachment(&self, page: &Bunch, file: &AttachmentFile, message: &str) -> Result<Bunch>;

  /// Add global labels to a page.
  async fn add_labels(&self, page: &Bunch, labels: &[String]) -> Result<Bunch>;

  /// Fetch a space, optionally with extra expansions.
  async fn get_space(&self, space: &str, additional_expansions: Option<&[String]>) -> Result<Bunch>;

  /// Ancestors of a page, root first.
  async fn get_page_ancestors(&self, page_id: Option<&str>) -> Result<Vec<Bunch>>;

  /// Labels of a page.
  async fn get_page_labels(&self, page_id: Option<&str>) -> Result<Vec<Bunch>>;

  /// Browsable URL of `page`.
  fn get_url(&self, page: &Bunch) -> Result<String> {
    url::page_url(page)
  }

  /// Id of the direct parent of `page`.
  fn get_parent_id(&self, page: &Bunch) -> Result<Bunch> {
    url::parent_id(page)
  }
}
