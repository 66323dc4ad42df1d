//! HTTP client implementation for talking to the Confluence REST API.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use super::api::ConfluenceApi;
use super::attachment::AttachmentFile;
use super::config::{Auth, ClientConfig};
use super::models::{CreatePageRequest, PageUpdate, UpdatePageRequest, label_records};
use super::request::{ATLASSIAN_TOKEN_HEADER, ApiRequest, attachment_fields};
use super::retry::{RetryDecision, RetryPolicy};
use crate::bunch::Bunch;
use crate::error::{Error, Result};

/// Confluence API client.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct ConfluenceClient {
  host: Url,
  auth: Auth,
  client: reqwest::Client,
  retry: RetryPolicy,
}

impl std::fmt::Debug for ConfluenceClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ConfluenceClient")
      .field("host", &self.host.as_str())
      .field("auth", &self.auth)
      .field("retry", &self.retry)
      .finish_non_exhaustive()
  }
}

impl ConfluenceClient {
  /// Create a new Confluence client.
  ///
  /// No network request is made here.
  ///
  /// # Errors
  /// [`Error::Config`] when authentication is incomplete or the host is not
  /// an absolute URL; [`Error::Transport`] if the underlying
  /// `reqwest::Client` cannot be built.
  pub fn new(config: ClientConfig) -> Result<Self> {
    let auth = config.auth()?;
    let host = config.host_url()?;

    let mut builder = reqwest::Client::builder().user_agent(format!(
      "minimal-confluence/{} ({})",
      env!("CARGO_PKG_VERSION"),
      env!("TARGET")
    ));

    if !config.verify_tls {
      warn!(host = %host, "TLS certificate verification is disabled for this client");
      builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      host,
      auth,
      client: builder.build()?,
      retry: RetryPolicy::new(config.max_retries),
    })
  }

  /// Positional constructor: a token, or a username and password, is
  /// required.
  ///
  /// # Errors
  /// Same as [`ConfluenceClient::new`].
  pub fn from_parts(
    host: &str,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
    verify: bool,
    max_retries: u32,
  ) -> Result<Self> {
    let config = ClientConfig {
      username: username.map(str::to_string),
      password: password.map(str::to_string),
      token: token.map(str::to_string),
      verify_tls: verify,
      max_retries,
      ..ClientConfig::new(host)
    };
    Self::new(config)
  }

  /// Replace the retry policy (for example to shorten backoff in tests).
  #[must_use]
  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Host all request paths are resolved against; always ends with `/`.
  pub fn host(&self) -> &Url {
    &self.host
  }

  pub fn retry_policy(&self) -> &RetryPolicy {
    &self.retry
  }

  /// Get the authorization header value.
  fn auth_header(&self) -> String {
    match &self.auth {
      Auth::Bearer(token) => format!("Bearer {token}"),
      Auth::Basic { username, password } => {
        let credentials = format!("{username}:{password}");
        format!("Basic {}", BASE64.encode(credentials.as_bytes()))
      }
    }
  }

  /// Resolve a request path against the host with standard URL-join rules:
  /// a relative path is appended, a path starting with `/` replaces the
  /// host's path.
  fn resolve(&self, path: &str) -> Result<Url> {
    self
      .host
      .join(path)
      .map_err(|e| Error::config(format!("invalid request path {path:?}: {e}")))
  }

  fn build(&self, request: &ApiRequest, url: &Url) -> Result<reqwest::RequestBuilder> {
    let mut builder = self
      .client
      .request(request.method.clone(), url.clone())
      .header(AUTHORIZATION, self.auth_header());

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    for (name, value) in &request.headers {
      builder = builder.header(*name, value);
    }

    if let Some(fields) = &request.form {
      builder = builder.multipart(ApiRequest::build_form(fields)?);
    } else if let Some(body) = &request.json {
      builder = builder.json(body);
    }

    Ok(builder)
  }

  /// Send a request, applying the retry policy, and decode the JSON body.
  ///
  /// # Errors
  /// [`Error::Api`] for error statuses, [`Error::Transport`] for connection
  /// failures, [`Error::Decode`] when a success body is not JSON.
  pub async fn request(&self, request: ApiRequest) -> Result<Bunch> {
    let url = self.resolve(&request.path)?;
    let mut retries = 0;

    loop {
      debug!(method = %request.method, url = %url, attempt = retries + 1, "Sending Confluence request");

      let response = match self.build(&request, &url)?.send().await {
        Ok(response) => response,
        Err(err) => match self.retry.on_transport_error(retries, &err) {
          RetryDecision::Retry(delay) => {
            warn!(url = %url, error = %err, ?delay, "Request failed, retrying");
            sleep(delay).await;
            retries += 1;
            continue;
          }
          RetryDecision::DontRetry => return Err(err.into()),
        },
      };

      let status = response.status();
      if status.is_client_error() || status.is_server_error() {
        if let RetryDecision::Retry(delay) = self.retry.on_status(retries, status, response.headers()) {
          warn!(url = %url, %status, ?delay, "Confluence asked to retry later");
          sleep(delay).await;
          retries += 1;
          continue;
        }

        let body = match response.text().await {
          Ok(body) => body,
          Err(err) => {
            debug!(url = %url, %status, error = %err, "Failed to read error response body");
            String::from("(no error details)")
          }
        };
        return Err(Error::Api { status, body });
      }

      let bytes = response.bytes().await?;
      if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Bunch::Null);
      }
      let value: Value = serde_json::from_slice(&bytes)?;
      return Ok(Bunch::from(value));
    }
  }

  /// Fetch a page directly by id.
  pub async fn get_page_by_id(&self, page_id: &str) -> Result<Bunch> {
    self.request(ApiRequest::get(format!("api/v2/pages/{page_id}"))).await
  }

  async fn get_results(&self, path: String) -> Result<Vec<Bunch>> {
    match self.request(ApiRequest::get(path)).await? {
      Bunch::Object(mut envelope) => match envelope.shift_remove("results") {
        Some(Bunch::Array(results)) => Ok(results),
        _ => Err(Error::MissingField("results".to_string())),
      },
      _ => Err(Error::MissingField("results".to_string())),
    }
  }
}

fn require_page_id(page_id: Option<&str>) -> Result<&str> {
  page_id.ok_or_else(|| Error::config("page_id is required"))
}

#[async_trait]
impl ConfluenceApi for ConfluenceClient {
  async fn get_page(
    &self,
    title: Option<&str>,
    space_id: Option<&str>,
    page_id: Option<&str>,
  ) -> Result<Option<Bunch>> {
    if let Some(page_id) = page_id {
      return self.get_page_by_id(page_id).await.map(Some);
    }

    let Some(title) = title else {
      return Err(Error::config("at least one of title or page_id must be given"));
    };

    let mut search = ApiRequest::get("api/v2/pages").query("title", title);
    if let Some(space_id) = space_id {
      search = search.query("space-id", space_id);
    }

    // The search endpoint only returns partial pages, so fetch the first
    // hit again by id.
    let response = self.request(search).await?;
    let results = response
      .get("results")
      .and_then(Bunch::as_array)
      .ok_or_else(|| Error::MissingField("results".to_string()))?;

    match results.first() {
      Some(first) => {
        let id = first.require_id("id")?;
        self.get_page_by_id(&id).await.map(Some)
      }
      None => {
        debug!(title, space_id, "No page matched title search");
        Ok(None)
      }
    }
  }

  async fn create_page(
    &self,
    space: &str,
    title: &str,
    body: &str,
    parent_id: Option<&str>,
    update_message: Option<&str>,
    labels: Option<&[String]>,
  ) -> Result<Bunch> {
    if update_message.is_some() || labels.is_some() {
      warn!(
        title,
        "update_message and labels are not supported when creating a page and were not sent"
      );
    }

    let payload = CreatePageRequest::new(space, title, body, parent_id);
    self.request(ApiRequest::post("api/v2/pages").json(&payload)?).await
  }

  async fn update_page(
    &self,
    page: &Bunch,
    body: &str,
    parent_id: Option<&str>,
    update_message: Option<&str>,
    labels: Option<&[String]>,
    minor_edit: bool,
  ) -> Result<Bunch> {
    let payload = UpdatePageRequest::from_page(
      page,
      PageUpdate {
        body,
        parent_id,
        update_message,
        labels,
        minor_edit,
      },
    )?;
    let page_id = page.require_id("id")?;

    self
      .request(ApiRequest::put(format!("api/v2/pages/{page_id}")).json(&payload)?)
      .await
  }

  async fn get_attachment(&self, page: &Bunch, name: &str) -> Result<Option<Bunch>> {
    let page_id = page.require_id("id")?;
    let request = ApiRequest::get(format!("api/v2/pages/{page_id}/attachments"))
      .header(ATLASSIAN_TOKEN_HEADER, "nocheck")
      .header("Accept", "application/json")
      .query("filename", name);

    let response = self.request(request).await?;
    let results = response
      .get("results")
      .and_then(Bunch::as_array)
      .ok_or_else(|| Error::MissingField("results".to_string()))?;
    Ok(results.first().cloned())
  }

  async fn update_attachment(
    &self,
    page: &Bunch,
    file: &AttachmentFile,
    existing_attachment: &Bunch,
    message: &str,
  ) -> Result<Bunch> {
    let page_id = page.require_id("id")?;
    let attachment_id = existing_attachment.require_id("id")?;
    let request = ApiRequest::post(format!(
      "rest/api/content/{page_id}/child/attachment/{attachment_id}/data"
    ))
    .header(ATLASSIAN_TOKEN_HEADER, "nocheck")
    .form(attachment_fields(file, message));

    self.request(request).await
  }

  async fn create_attachment(&self, page: &Bunch, file: &AttachmentFile, message: &str) -> Result<Bunch> {
    let page_id = page.require_id("id")?;
    let request = ApiRequest::post(format!("rest/api/content/{page_id}/child/attachment"))
      .header(ATLASSIAN_TOKEN_HEADER, "nocheck")
      .query("allowDuplicated", "true")
      .form(attachment_fields(file, message));

    self.request(request).await
  }

  async fn add_labels(&self, page: &Bunch, labels: &[String]) -> Result<Bunch> {
    let page_id = page.require_id("id")?;
    let request = ApiRequest::post(format!("api/v2/pages/{page_id}/label")).json(&label_records(labels))?;
    self.request(request).await
  }

  async fn get_space(&self, space: &str, additional_expansions: Option<&[String]>) -> Result<Bunch> {
    let mut request = ApiRequest::get(format!("api/v2/spaces/{space}"));
    if let Some(expansions) = additional_expansions {
      request = request.query("expand", expansions.join(","));
    }
    self.request(request).await
  }

  async fn get_page_ancestors(&self, page_id: Option<&str>) -> Result<Vec<Bunch>> {
    let page_id = require_page_id(page_id)?;
    self.get_results(format!("api/v2/pages/{page_id}/ancestors")).await
  }

  async fn get_page_labels(&self, page_id: Option<&str>) -> Result<Vec<Bunch>> {
    let page_id = require_page_id(page_id)?;
    self.get_results(format!("api/v2/pages/{page_id}/labels")).await
  }
}

#[cfg(test)]
mod tests {
  use base64::Engine as _;

  use super::*;

  fn client(config: ClientConfig) -> ConfluenceClient {
    ConfluenceClient::new(config).unwrap()
  }

  #[test]
  fn test_confluence_client_new_adds_trailing_slash() {
    let client = client(ClientConfig::new("https://example.atlassian.net/wiki").token("t"));
    assert_eq!(client.host().as_str(), "https://example.atlassian.net/wiki/");
  }

  #[test]
  fn test_confluence_client_requires_credentials() {
    let result = ConfluenceClient::from_parts("https://example.atlassian.net", None, None, None, true, 4);
    assert!(matches!(result, Err(Error::Config(_))));

    let result = ConfluenceClient::from_parts("https://example.atlassian.net", Some("user"), None, None, true, 4);
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[test]
  fn test_bearer_auth_header() {
    let client = client(ClientConfig::new("https://example.atlassian.net").token("secret-token"));
    assert_eq!(client.auth_header(), "Bearer secret-token");
  }

  #[test]
  fn test_basic_auth_header_format() {
    let client = client(
      ClientConfig::new("https://example.atlassian.net").basic_auth("user@example.com", "test-token"),
    );

    let auth_header = client.auth_header();
    let encoded = auth_header.strip_prefix("Basic ").unwrap();
    let decoded = BASE64.decode(encoded.as_bytes()).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), "user@example.com:test-token");
  }

  #[test]
  fn test_from_parts_keeps_retry_budget() {
    let client =
      ConfluenceClient::from_parts("https://example.atlassian.net", None, None, Some("t"), false, 7).unwrap();
    assert_eq!(client.retry_policy().max_retries(), 7);
  }

  #[test]
  fn resolve_appends_relative_paths() {
    let client = client(ClientConfig::new("https://example.atlassian.net/wiki").token("t"));
    assert_eq!(
      client.resolve("api/v2/pages/1").unwrap().as_str(),
      "https://example.atlassian.net/wiki/api/v2/pages/1"
    );
  }

  #[test]
  fn resolve_absolute_paths_replace_host_path() {
    let client = client(ClientConfig::new("https://example.atlassian.net/wiki").token("t"));
    assert_eq!(
      client.resolve("/api/v2/pages/1").unwrap().as_str(),
      "https://example.atlassian.net/api/v2/pages/1"
    );
  }

  #[test]
  fn get_url_and_parent_id_use_page_links() {
    let client = client(ClientConfig::new("https://example.atlassian.net").token("t"));
    let page = Bunch::from(serde_json::json!({
      "_links": { "base": "https://x", "webui": "/y" },
      "ancestors": [{ "id": "1" }, { "id": "2" }]
    }));

    assert_eq!(client.get_url(&page).unwrap(), "https://x/y");
    assert_eq!(client.get_parent_id(&page).unwrap().as_str(), Some("2"));
  }

  #[tokio::test]
  async fn get_page_without_title_or_id_is_rejected() {
    let client = client(ClientConfig::new("https://example.atlassian.net").token("t"));
    let result = client.get_page(None, Some("SPACE"), None).await;
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[tokio::test]
  async fn ancestors_and_labels_require_page_id() {
    let client = client(ClientConfig::new("https://example.atlassian.net").token("t"));
    assert!(matches!(client.get_page_ancestors(None).await, Err(Error::Config(_))));
    assert!(matches!(client.get_page_labels(None).await, Err(Error::Config(_))));
  }
}
