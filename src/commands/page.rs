//! Page subcommand handlers.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::bunch::Bunch;
use crate::cli::PageCommand;
use crate::confluence::{ConfluenceApi, page_id_from_input};

/// Dispatch `minimal-confluence page ...`.
///
/// # Returns
/// The JSON to print: the page itself, or a string for `url`/`parent`.
pub async fn handle_page_command(api: &dyn ConfluenceApi, subcommand: &PageCommand) -> Result<Bunch> {
  match subcommand {
    PageCommand::Get {
      page,
      title,
      space_id,
    } => get_page(api, page.as_deref(), title.as_deref(), space_id.as_deref()).await,
    PageCommand::Create {
      space,
      title,
      body,
      parent,
    } => {
      let body = read_body(body).await?;
      info!(%space, %title, "Creating page");
      api
        .create_page(space, title, &body, parent.as_deref(), None, None)
        .await
        .with_context(|| format!("Failed to create page {title:?}"))
    }
    PageCommand::Update {
      page,
      body,
      parent,
      message,
      labels,
      minor,
    } => {
      let body = read_body(body).await?;
      let existing = fetch(api, page).await?;
      let labels = (!labels.is_empty()).then_some(labels.as_slice());
      info!(page = %existing["id"], "Updating page");
      api
        .update_page(
          &existing,
          &body,
          parent.as_deref(),
          message.as_deref(),
          labels,
          *minor,
        )
        .await
        .context("Failed to update page")
    }
    PageCommand::Url { page } => {
      let page = fetch(api, page).await?;
      Ok(Bunch::String(api.get_url(&page)?))
    }
    PageCommand::Parent { page } => {
      let page = fetch(api, page).await?;
      Ok(api.get_parent_id(&page)?)
    }
  }
}

/// Resolve `page get` arguments, failing when a title search finds nothing.
pub async fn get_page(
  api: &dyn ConfluenceApi,
  page: Option<&str>,
  title: Option<&str>,
  space_id: Option<&str>,
) -> Result<Bunch> {
  let page_id = page.map(page_id_from_input).transpose()?;
  if page_id.is_none() && title.is_none() {
    return Err(anyhow!("Either --id or --title is required"));
  }

  api
    .get_page(title, space_id, page_id.as_deref())
    .await
    .context("Failed to fetch page")?
    .ok_or_else(|| anyhow!("No page titled {:?} was found", title.unwrap_or_default()))
}

/// Ancestors of a page, root first.
pub async fn ancestors(api: &dyn ConfluenceApi, page: &str) -> Result<Bunch> {
  let page_id = page_id_from_input(page)?;
  let ancestors = api
    .get_page_ancestors(Some(&page_id))
    .await
    .with_context(|| format!("Failed to fetch ancestors of page {page_id}"))?;
  Ok(Bunch::Array(ancestors))
}

/// Fetch the full page a command operates on.
pub(crate) async fn fetch(api: &dyn ConfluenceApi, page: &str) -> Result<Bunch> {
  let page_id = page_id_from_input(page)?;
  api
    .get_page(None, None, Some(&page_id))
    .await
    .with_context(|| format!("Failed to fetch page {page_id}"))?
    .ok_or_else(|| anyhow!("Page {page_id} was not found"))
}

async fn read_body(path: &Path) -> Result<String> {
  tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("Failed to read page body from {}", path.display()))
}
