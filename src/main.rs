//! minimal-confluence - command-line front end for the Confluence client
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  minimal_confluence::cli::run().await;
}
