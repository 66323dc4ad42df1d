//! Confluence module providing the API trait, the HTTP client, request
//! payloads, retry policy, and page-link helpers.

pub mod api;
pub mod attachment;
pub mod client;
pub mod config;
pub mod models;
pub mod request;
pub mod retry;
pub mod url;

pub use api::ConfluenceApi;
pub use attachment::AttachmentFile;
pub use client::ConfluenceClient;
pub use config::{Auth, ClientConfig, DEFAULT_MAX_RETRIES};
pub use request::ApiRequest;
pub use retry::{RetryDecision, RetryPolicy};
pub use url::{page_id_from_input, page_url, parent_id};
