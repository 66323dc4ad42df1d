//! Error types returned by the Confluence client.

use reqwest::StatusCode;

/// Errors produced while configuring the client or talking to Confluence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Invalid or incomplete constructor/call arguments. Raised before any
  /// network request is attempted.
  #[error("invalid configuration: {0}")]
  Config(String),

  /// Connection-level failure, surfaced once the retry policy gives up.
  #[error("HTTP request failed")]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("Confluence API returned error {status}: {body}")]
  Api {
    /// HTTP status code.
    status: StatusCode,
    /// Response body exactly as received.
    body: String,
  },

  /// A success response whose body was not valid JSON.
  #[error("failed to decode Confluence API response")]
  Decode(#[from] serde_json::Error),

  /// A page (or other response) lacks a field the operation depends on.
  #[error("response is missing field `{0}`")]
  MissingField(String),

  /// Reading local attachment content failed.
  #[error("I/O error")]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn config(message: impl Into<String>) -> Self {
    Self::Config(message.into())
  }

  /// HTTP status of an [`Error::Api`] failure.
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Self::Api { status, .. } => Some(*status),
      Self::Transport(err) => err.status(),
      _ => None,
    }
  }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
