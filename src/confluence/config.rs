//! Client configuration and credential resolution.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Authentication scheme sent with every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
  /// Personal access token, sent as `Authorization: Bearer <token>`.
  Bearer(String),
  /// HTTP basic credentials (username or email plus password or API token).
  Basic { username: String, password: String },
}

impl std::fmt::Debug for Auth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Bearer(_) => f.write_str("Bearer(***)"),
      Self::Basic { username, .. } => f.debug_struct("Basic").field("username", username).finish_non_exhaustive(),
    }
  }
}

/// Settings used to construct a [`ConfluenceClient`](super::ConfluenceClient).
///
/// Exactly one authentication scheme must be available: a token, or both a
/// username and a password. When a token is present it wins, even if a
/// username or password was also given.
#[derive(Clone)]
pub struct ClientConfig {
  pub host: String,
  pub username: Option<String>,
  pub password: Option<String>,
  pub token: Option<String>,
  /// Verify TLS certificates (default `true`).
  pub verify_tls: bool,
  /// Retries after the first attempt for transient failures.
  pub max_retries: u32,
  /// Per-request timeout. `None` leaves the transport default in place.
  pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClientConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClientConfig")
      .field("host", &self.host)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "***"))
      .field("token", &self.token.as_ref().map(|_| "***"))
      .field("verify_tls", &self.verify_tls)
      .field("max_retries", &self.max_retries)
      .field("timeout", &self.timeout)
      .finish()
  }
}

impl ClientConfig {
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      username: None,
      password: None,
      token: None,
      verify_tls: true,
      max_retries: DEFAULT_MAX_RETRIES,
      timeout: None,
    }
  }

  pub fn token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  pub fn username(mut self, username: impl Into<String>) -> Self {
    self.username = Some(username.into());
    self
  }

  pub fn password(mut self, password: impl Into<String>) -> Self {
    self.password = Some(password.into());
    self
  }

  pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
    self.username(username).password(password)
  }

  pub fn verify_tls(mut self, verify: bool) -> Self {
    self.verify_tls = verify;
    self
  }

  pub fn max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries;
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = Some(timeout);
    self
  }

  /// Resolve the authentication scheme.
  ///
  /// # Errors
  /// Returns [`Error::Config`] when no token is set and either the username
  /// or the password is missing.
  pub fn auth(&self) -> Result<Auth> {
    if let Some(token) = &self.token {
      return Ok(Auth::Bearer(token.clone()));
    }

    match (&self.username, &self.password) {
      (Some(username), Some(password)) => Ok(Auth::Basic {
        username: username.clone(),
        password: password.clone(),
      }),
      _ => Err(Error::config(
        "either a personal access token, or username and password are required",
      )),
    }
  }

  /// Parse the host and make sure it ends with `/` so relative request paths
  /// are appended rather than replacing the last segment.
  ///
  /// # Errors
  /// Returns [`Error::Config`] when the host is not an absolute URL.
  pub fn host_url(&self) -> Result<Url> {
    let host = self.host.trim();
    let normalized = if host.ends_with('/') {
      host.to_string()
    } else {
      format!("{host}/")
    };

    let url = Url::parse(&normalized).map_err(|e| Error::config(format!("invalid host {host:?}: {e}")))?;
    if url.cannot_be_a_base() {
      return Err(Error::config(format!("invalid host {host:?}: not a base URL")));
    }

    Ok(url)
  }
}
