//! Command-line interface definitions for minimal-confluence.
//!
//! Each subcommand maps onto a single client operation and prints the JSON
//! the API returned.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands;

/// minimal-confluence - talk to the Confluence REST API from the shell
#[derive(Debug, Parser)]
#[command(
  name = "minimal-confluence",
  version,
  about = "Read and write Confluence pages, attachments, labels and spaces",
  long_about = "A thin command-line front end for the minimal Confluence client.\n\
                Every subcommand performs one API operation and prints the JSON response.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Connection options
  #[command(flatten)]
  pub connection: ConnectionOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Fetch, create and update pages
  Page {
    #[command(subcommand)]
    subcommand: PageCommand,
  },

  /// Look up and upload attachments
  Attachment {
    #[command(subcommand)]
    subcommand: AttachmentCommand,
  },

  /// List and add page labels
  Labels {
    #[command(subcommand)]
    subcommand: LabelsCommand,
  },

  /// Fetch a space
  Space {
    /// Space id
    #[arg(value_name = "SPACE_ID")]
    space: String,

    /// Additional expansions to request (repeatable)
    #[arg(long = "expand", value_name = "NAME")]
    expand: Vec<String>,
  },

  /// List the ancestors of a page, root first
  Ancestors {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Page subcommands
#[derive(Debug, Subcommand)]
pub enum PageCommand {
  /// Fetch a page by id, or by title (optionally within a space)
  Get {
    /// Page URL or numeric page ID
    #[arg(long = "id", value_name = "PAGE_URL_OR_ID", conflicts_with = "title")]
    page: Option<String>,

    /// Page title to search for
    #[arg(long)]
    title: Option<String>,

    /// Space id restricting the title search
    #[arg(long, value_name = "SPACE_ID", requires = "title")]
    space_id: Option<String>,
  },

  /// Create a page from a storage-format file
  Create {
    /// Space id to create the page in
    #[arg(long, value_name = "SPACE_ID")]
    space: String,

    /// Page title
    #[arg(long)]
    title: String,

    /// File holding the page body in storage format
    #[arg(long, value_name = "FILE")]
    body: PathBuf,

    /// Parent page id
    #[arg(long, value_name = "PAGE_ID")]
    parent: Option<String>,
  },

  /// Replace the body of an existing page
  Update {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,

    /// File holding the new body in storage format
    #[arg(long, value_name = "FILE")]
    body: PathBuf,

    /// Move the page under this parent
    #[arg(long, value_name = "PAGE_ID")]
    parent: Option<String>,

    /// Revision comment shown in the page history
    #[arg(short, long)]
    message: Option<String>,

    /// Label the updated page should carry (repeatable)
    #[arg(long = "label", value_name = "LABEL")]
    labels: Vec<String>,

    /// Mark the change as a minor edit
    #[arg(long)]
    minor: bool,
  },

  /// Print the browsable URL of a page
  Url {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,
  },

  /// Print the id of a page's direct parent
  Parent {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,
  },
}

/// Attachment subcommands
#[derive(Debug, Subcommand)]
pub enum AttachmentCommand {
  /// Look up an attachment by file name
  Get {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,

    /// Attachment file name
    #[arg(value_name = "NAME")]
    name: String,
  },

  /// Upload a file, replacing an attachment of the same name if present
  Upload {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,

    /// File to upload
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Comment stored with the attachment version
    #[arg(short, long, default_value = "")]
    comment: String,
  },
}

/// Label subcommands
#[derive(Debug, Subcommand)]
pub enum LabelsCommand {
  /// List the labels of a page
  List {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,
  },

  /// Add global labels to a page
  Add {
    /// Page URL or numeric page ID
    #[arg(value_name = "PAGE_URL_OR_ID")]
    page: String,

    /// Labels to add
    #[arg(value_name = "LABEL", required = true)]
    labels: Vec<String>,
  },
}

/// Supported shells for completion scripts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) if !parsed.cannot_be_a_base() => parsed,
    _ => {
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  Ok(parsed.to_string())
}

/// Connection options
#[derive(Debug, Parser)]
pub struct ConnectionOptions {
  /// Confluence base URL, including any context path (e.g. https://example.atlassian.net/wiki)
  #[arg(long, env = "CONFLUENCE_URL", value_name = "URL", value_parser = normalize_url)]
  pub url: Option<String>,

  /// Username or email for basic authentication
  #[arg(long, env = "CONFLUENCE_USER", value_name = "USER")]
  pub user: Option<String>,

  /// Password or API token for basic authentication
  #[arg(long, env = "CONFLUENCE_PASSWORD", value_name = "PASSWORD", hide_env_values = true)]
  pub password: Option<String>,

  /// Personal access token (takes precedence over --user/--password)
  #[arg(long, env = "CONFLUENCE_TOKEN", value_name = "TOKEN", hide_env_values = true)]
  pub token: Option<String>,

  /// Skip TLS certificate verification
  #[arg(long)]
  pub insecure: bool,

  /// Retries for transient failures
  #[arg(long, default_value_t = crate::confluence::DEFAULT_MAX_RETRIES, value_name = "N")]
  pub max_retries: u32,

  /// Request timeout in seconds
  #[arg(long, value_name = "SECONDS")]
  pub timeout: Option<u64>,
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Parse CLI arguments, initialize logging, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = commands::dispatch(&cli, &colors).await {
    eprintln!("{} {e:#}", colors.error("Error:"));
    process::exit(1);
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
