//! Transport-level retry policy.
//!
//! Every HTTP method is retried, not only the idempotent ones. Connection
//! failures are retried with exponential backoff; error statuses are retried
//! only when the server asks for it with a `Retry-After` header on a 413, 429
//! or 503 response.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Statuses for which a `Retry-After` header triggers a retry.
const RETRY_AFTER_STATUSES: [StatusCode; 3] = [
  StatusCode::PAYLOAD_TOO_LARGE,
  StatusCode::TOO_MANY_REQUESTS,
  StatusCode::SERVICE_UNAVAILABLE,
];

/// Upper bound for a single computed backoff.
const BACKOFF_MAX: Duration = Duration::from_secs(120);

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
  /// Wait for the given duration, then send the request again.
  Retry(Duration),
  /// Surface the failure to the caller.
  DontRetry,
}

/// Retry configuration applied by the client's transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
  max_retries: u32,
  backoff_factor: f64,
  respect_retry_after: bool,
}

impl RetryPolicy {
  /// Policy with backoff factor 1 that honors `Retry-After`.
  pub fn new(max_retries: u32) -> Self {
    Self {
      max_retries,
      backoff_factor: 1.0,
      respect_retry_after: true,
    }
  }

  /// Policy that never retries.
  pub fn none() -> Self {
    Self::new(0)
  }

  #[must_use]
  pub fn with_backoff_factor(mut self, factor: f64) -> Self {
    self.backoff_factor = factor.max(0.0);
    self
  }

  #[must_use]
  pub fn with_respect_retry_after(mut self, respect: bool) -> Self {
    self.respect_retry_after = respect;
    self
  }

  pub fn max_retries(&self) -> u32 {
    self.max_retries
  }

  /// Backoff before the `retry`-th retry (1-based).
  ///
  /// The first retry is immediate; later ones wait
  /// `factor * 2^(retry - 1)` seconds, capped at two minutes.
  pub fn backoff(&self, retry: u32) -> Duration {
    if retry <= 1 {
      return Duration::ZERO;
    }

    let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
    let seconds = self.backoff_factor * 2f64.powi(exponent);
    if !seconds.is_finite() || seconds >= BACKOFF_MAX.as_secs_f64() {
      return BACKOFF_MAX;
    }
    Duration::from_secs_f64(seconds)
  }

  /// Decide whether a connection-level error should be retried.
  ///
  /// `retries_so_far` counts the retries already performed for this request.
  pub fn on_transport_error(&self, retries_so_far: u32, err: &reqwest::Error) -> RetryDecision {
    if !(err.is_connect() || err.is_timeout() || err.is_request()) {
      return RetryDecision::DontRetry;
    }
    self.next_backoff(retries_so_far)
  }

  /// Decide whether an error status should be retried.
  pub fn on_status(&self, retries_so_far: u32, status: StatusCode, headers: &HeaderMap) -> RetryDecision {
    if !self.respect_retry_after || !RETRY_AFTER_STATUSES.contains(&status) {
      return RetryDecision::DontRetry;
    }

    let Some(delay) = parse_retry_after(headers, Utc::now()) else {
      return RetryDecision::DontRetry;
    };

    if retries_so_far >= self.max_retries {
      return RetryDecision::DontRetry;
    }
    RetryDecision::Retry(delay)
  }

  fn next_backoff(&self, retries_so_far: u32) -> RetryDecision {
    if retries_so_far >= self.max_retries {
      return RetryDecision::DontRetry;
    }
    RetryDecision::Retry(self.backoff(retries_so_far + 1))
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::new(super::config::DEFAULT_MAX_RETRIES)
  }
}

/// Parse a `Retry-After` header given either as delay seconds or as an HTTP
/// date. Dates in the past yield a zero delay.
pub fn parse_retry_after(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Duration> {
  let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

  if let Ok(seconds) = raw.parse::<u64>() {
    return Some(Duration::from_secs(seconds));
  }

  let at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
  Some((at - now).to_std().unwrap_or(Duration::ZERO))
}
