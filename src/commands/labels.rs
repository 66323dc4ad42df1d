//! Label subcommand handlers.

use anyhow::{Context, Result};

use super::page::fetch;
use crate::bunch::Bunch;
use crate::cli::LabelsCommand;
use crate::confluence::{ConfluenceApi, page_id_from_input};

/// Dispatch `minimal-confluence labels ...`.
pub async fn handle_labels_command(api: &dyn ConfluenceApi, subcommand: &LabelsCommand) -> Result<Bunch> {
  match subcommand {
    LabelsCommand::List { page } => {
      let page_id = page_id_from_input(page)?;
      let labels = api
        .get_page_labels(Some(&page_id))
        .await
        .with_context(|| format!("Failed to fetch labels of page {page_id}"))?;
      Ok(Bunch::Array(labels))
    }
    LabelsCommand::Add { page, labels } => {
      let page = fetch(api, page).await?;
      api.add_labels(&page, labels).await.context("Failed to add labels")
    }
  }
}
