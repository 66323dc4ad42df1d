//! Helpers for deriving links and identifiers from page references.

use url::Url;

use crate::bunch::Bunch;
use crate::error::{Error, Result};

/// Browsable URL of a page: `_links.base` followed by `_links.webui`.
///
/// # Errors
/// [`Error::MissingField`] when either link is absent.
pub fn page_url(page: &Bunch) -> Result<String> {
  let base = page.require_str("_links.base")?;
  let webui = page.require_str("_links.webui")?;
  Ok(format!("{base}{webui}"))
}

/// Id of the page's direct parent, i.e. the last entry of `ancestors`
/// (which is ordered from the root down).
///
/// # Errors
/// [`Error::MissingField`] when the page has no ancestors or the last one has
/// no id.
pub fn parent_id(page: &Bunch) -> Result<Bunch> {
  let parent = page
    .require("ancestors")?
    .as_array()
    .and_then(<[Bunch]>::last)
    .ok_or_else(|| Error::MissingField("ancestors".to_string()))?;

  parent.require("id").cloned()
}

/// Accept either a bare page id or a page URL and return the page id.
///
/// Recognized URL shapes:
/// - https://example.atlassian.net/wiki/spaces/SPACE/pages/123456/Page+Title
/// - https://example.atlassian.net/wiki/pages/123456
/// - https://confluence.example.com/pages/viewpage.action?pageId=123456
///
/// # Errors
/// [`Error::Config`] when the input is neither numeric nor a URL carrying a
/// numeric page id.
pub fn page_id_from_input(input: &str) -> Result<String> {
  let input = input.trim();
  if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
    return Ok(input.to_string());
  }

  let parsed = Url::parse(input).map_err(|e| Error::config(format!("not a page id or URL: {input:?} ({e})")))?;

  if let Some((_, id)) = parsed.query_pairs().find(|(key, _)| key == "pageId") {
    return numeric(&id);
  }

  let segments: Vec<&str> = parsed.path_segments().map(Iterator::collect).unwrap_or_default();
  let position = segments
    .iter()
    .position(|&s| s == "pages")
    .ok_or_else(|| Error::config(format!("URL does not contain a 'pages' segment: {input}")))?;

  let id = segments
    .get(position + 1)
    .ok_or_else(|| Error::config(format!("URL does not contain a page id after 'pages': {input}")))?;

  numeric(id)
}

fn numeric(id: &str) -> Result<String> {
  if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
    Ok(id.to_string())
  } else {
    Err(Error::config(format!("page id is not numeric: {id}")))
  }
}
