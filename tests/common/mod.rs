//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fake_confluence;
pub mod fixtures;

use minimal_confluence::confluence::RetryPolicy;
use minimal_confluence::{ClientConfig, ConfluenceClient};

/// Client pointed at a mock server, authenticated with a bearer token.
pub fn client_for(base_url: &str) -> ConfluenceClient {
  ConfluenceClient::new(ClientConfig::new(base_url).token("secret-token")).unwrap()
}

/// Client that retries without waiting between attempts.
pub fn fast_retry_client(base_url: &str, max_retries: u32) -> ConfluenceClient {
  client_for(base_url).with_retry_policy(RetryPolicy::new(max_retries).with_backoff_factor(0.0))
}
