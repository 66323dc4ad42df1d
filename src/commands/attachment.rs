//! Attachment subcommand handlers.

use anyhow::{Context, Result};
use tracing::info;

use super::page::fetch;
use crate::bunch::Bunch;
use crate::cli::AttachmentCommand;
use crate::confluence::{AttachmentFile, ConfluenceApi};

/// Dispatch `minimal-confluence attachment ...`.
pub async fn handle_attachment_command(api: &dyn ConfluenceApi, subcommand: &AttachmentCommand) -> Result<Bunch> {
  match subcommand {
    AttachmentCommand::Get { page, name } => {
      let page = fetch(api, page).await?;
      let attachment = api
        .get_attachment(&page, name)
        .await
        .with_context(|| format!("Failed to look up attachment {name:?}"))?;
      Ok(attachment.unwrap_or_default())
    }
    AttachmentCommand::Upload { page, file, comment } => {
      let page = fetch(api, page).await?;
      let file = AttachmentFile::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
      upload(api, &page, &file, comment).await
    }
  }
}

/// Upload `file`, replacing the attachment with the same name when the page
/// already has one.
pub async fn upload(api: &dyn ConfluenceApi, page: &Bunch, file: &AttachmentFile, comment: &str) -> Result<Bunch> {
  let existing = api
    .get_attachment(page, &file.file_name)
    .await
    .with_context(|| format!("Failed to look up attachment {:?}", file.file_name))?;

  match existing {
    Some(existing) => {
      info!(name = %file.file_name, id = %existing["id"], "Updating existing attachment");
      api
        .update_attachment(page, file, &existing, comment)
        .await
        .context("Failed to update attachment")
    }
    None => {
      info!(name = %file.file_name, page = %page["id"], "Uploading new attachment");
      api
        .create_attachment(page, file, comment)
        .await
        .context("Failed to create attachment")
    }
  }
}
