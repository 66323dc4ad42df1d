//! Minimal Confluence client library
//!
//! Reads and writes pages, attachments, labels, spaces and ancestors through
//! the Confluence REST API (v2, with v1 endpoints for attachment upload).
//! Responses come back as [`Bunch`] values that can be navigated by field
//! name.

pub mod bunch;
pub mod cli;
pub mod color;
pub mod commands;
pub mod confluence;
pub mod error;

pub use bunch::Bunch;
pub use confluence::{AttachmentFile, ClientConfig, ConfluenceApi, ConfluenceClient};
pub use error::{Error, Result};
