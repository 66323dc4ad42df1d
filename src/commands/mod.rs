//! CLI subcommand handlers.
//!
//! Handlers are written against [`ConfluenceApi`] and return the JSON the
//! API produced; [`dispatch`] prints it to stdout and a short status line to
//! stderr for commands that change something.

pub mod attachment;
pub mod completions;
pub mod labels;
pub mod page;
pub mod version;

use std::time::Duration;

use anyhow::{Context, Result};

use crate::bunch::Bunch;
use crate::cli::{Cli, Command, ConnectionOptions, PageCommand};
use crate::color::ColorScheme;
use crate::confluence::{ClientConfig, ConfluenceApi, ConfluenceClient};

/// Run the parsed command.
///
/// # Errors
/// Any configuration, transport or API failure, with context describing the
/// step that failed.
pub async fn dispatch(cli: &Cli, colors: &ColorScheme) -> Result<()> {
  let output = match &cli.command {
    Command::Version { json, short } => {
      version::handle_version_command(*json, *short, colors);
      return Ok(());
    }
    Command::Completions { shell } => {
      completions::handle_completions_command(*shell);
      return Ok(());
    }
    Command::Page { subcommand } => page::handle_page_command(&connect(&cli.connection)?, subcommand).await?,
    Command::Attachment { subcommand } => {
      attachment::handle_attachment_command(&connect(&cli.connection)?, subcommand).await?
    }
    Command::Labels { subcommand } => labels::handle_labels_command(&connect(&cli.connection)?, subcommand).await?,
    Command::Space { space, expand } => get_space(&connect(&cli.connection)?, space, expand).await?,
    Command::Ancestors { page } => page::ancestors(&connect(&cli.connection)?, page).await?,
  };

  if !cli.behavior.quiet
    && let Some(status) = status_line(&cli.command, &output, colors)
  {
    eprintln!("{status}");
  }

  println!(
    "{}",
    serde_json::to_string_pretty(&output).context("Failed to render response as JSON")?
  );
  Ok(())
}

/// Build a client from the connection options.
///
/// # Errors
/// Returns an error when no URL is configured or the credentials are
/// incomplete.
pub fn connect(options: &ConnectionOptions) -> Result<ConfluenceClient> {
  let url = options
    .url
    .as_deref()
    .context("--url is required (or set CONFLUENCE_URL)")?;

  let mut config = ClientConfig::new(url)
    .verify_tls(!options.insecure)
    .max_retries(options.max_retries);
  config.username = options.user.clone();
  config.password = options.password.clone();
  config.token = options.token.clone();
  if let Some(seconds) = options.timeout {
    config = config.timeout(Duration::from_secs(seconds));
  }

  ConfluenceClient::new(config).context("Failed to create API client")
}

async fn get_space(api: &dyn ConfluenceApi, space: &str, expand: &[String]) -> Result<Bunch> {
  let expansions = (!expand.is_empty()).then_some(expand);
  api
    .get_space(space, expansions)
    .await
    .with_context(|| format!("Failed to fetch space {space}"))
}

/// One-line summary for commands that modify content.
fn status_line(command: &Command, output: &Bunch, colors: &ColorScheme) -> Option<String> {
  let verb = match command {
    Command::Page {
      subcommand: PageCommand::Create { .. },
    } => "Created",
    Command::Page {
      subcommand: PageCommand::Update { .. },
    } => "Updated",
    _ => return None,
  };

  let title = output["title"].as_str().unwrap_or("(untitled)");
  let id = output["id"].as_id().unwrap_or_default();
  let mut line = format!(
    "{} {verb} {} ({} {})",
    colors.success("✓"),
    colors.emphasis(title),
    colors.dimmed("id"),
    colors.number(id)
  );
  if let Some(version) = output.path("version.number").and_then(Bunch::as_i64) {
    line.push_str(&format!(", version {}", colors.number(version)));
  }
  if let Ok(url) = crate::confluence::page_url(output) {
    line.push_str(&format!("\n  {}", colors.link(url)));
  }
  Some(line)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::cli::ColorOption;

  #[test]
  fn status_line_for_created_page() {
    let cli = <Cli as clap::Parser>::try_parse_from([
      "minimal-confluence",
      "page",
      "create",
      "--space",
      "SPC",
      "--title",
      "T",
      "--body",
      "body.xml",
    ])
    .unwrap();
    let output = Bunch::from(json!({
      "id": "99",
      "title": "T",
      "version": { "number": 1 },
      "_links": { "base": "https://x/wiki", "webui": "/spaces/SPC/pages/99" }
    }));

    let line = status_line(&cli.command, &output, &ColorScheme::new(ColorOption::Never)).unwrap();
    assert_eq!(line, "✓ Created T (id 99), version 1\n  https://x/wiki/spaces/SPC/pages/99");
  }

  #[test]
  fn status_line_skipped_for_reads() {
    let cli = <Cli as clap::Parser>::try_parse_from(["minimal-confluence", "ancestors", "1"]).unwrap();
    assert!(status_line(&cli.command, &Bunch::Null, &ColorScheme::new(ColorOption::Never)).is_none());
  }

  #[test]
  fn connect_requires_url() {
    let options = ConnectionOptions {
      url: None,
      user: None,
      password: None,
      token: Some("t".to_string()),
      insecure: false,
      max_retries: 4,
      timeout: None,
    };
    assert!(connect(&options).is_err());
  }

  #[test]
  fn connect_requires_credentials() {
    let options = ConnectionOptions {
      url: Some("https://example.atlassian.net/wiki".to_string()),
      user: Some("user".to_string()),
      password: None,
      token: None,
      insecure: false,
      max_retries: 4,
      timeout: Some(30),
    };
    let err = connect(&options).unwrap_err();
    assert!(format!("{err:#}").contains("username and password"));
  }
}
