//! HTTP transport for the Notion API.

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use super::{ListPage, RemoteError, RemoteTransport};

/// Public API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const LIST_PAGE_SIZE: &str = "100";
const SEARCH_PAGE_SIZE: u32 = 50;

/// Talks to the Notion REST API with an integration token.
///
/// Rate-limited (429) and server-error (5xx) responses are retried up to
/// three attempts in total; 429 honours `Retry-After`.
#[derive(Debug, Clone)]
pub struct NotionTransport {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry_unit: Duration,
}

impl NotionTransport {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            retry_unit: Duration::from_secs(1),
        })
    }

    /// Scales the wait between retries (one unit per second of back-off).
    pub fn with_retry_unit(mut self, retry_unit: Duration) -> Self {
        self.retry_unit = retry_unit;
        self
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, RemoteError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(&self.token)
                .header("Notion-Version", NOTION_VERSION)
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                return Ok(response.json().await?);
            }

            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());
            let message = error_message(&response.text().await.unwrap_or_default());

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < MAX_ATTEMPTS {
                let wait = if status == StatusCode::TOO_MANY_REQUESTS {
                    self.retry_unit * retry_after.unwrap_or(1)
                } else {
                    self.retry_unit * attempt
                };
                tracing::warn!(
                    "{} {} returned {}, retrying in {:?} (attempt {}/{})",
                    method,
                    path,
                    status,
                    wait,
                    attempt,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }
    }
}

/// Extracts the `message` of an API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn into_page(value: Value) -> Result<ListPage, RemoteError> {
    serde_json::from_value(value).map_err(|e| RemoteError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl RemoteTransport for NotionTransport {
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<ListPage, RemoteError> {
        let mut query = vec![("page_size", LIST_PAGE_SIZE)];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }
        let path = format!("/blocks/{}/children", block_id);
        into_page(self.request(Method::GET, &path, &query, None).await?)
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), RemoteError> {
        let path = format!("/blocks/{}", block_id);
        self.request(Method::DELETE, &path, &[], None).await?;
        Ok(())
    }

    async fn append_children(
        &self,
        block_id: &str,
        children: Vec<Value>,
    ) -> Result<(), RemoteError> {
        let path = format!("/blocks/{}/children", block_id);
        let body = json!({ "children": children });
        self.request(Method::PATCH, &path, &[], Some(&body)).await?;
        Ok(())
    }

    async fn search_pages(&self, cursor: Option<&str>) -> Result<ListPage, RemoteError> {
        let mut body = json!({
            "filter": { "property": "object", "value": "page" },
            "page_size": SEARCH_PAGE_SIZE,
        });
        if let Some(cursor) = cursor {
            body["start_cursor"] = json!(cursor);
        }
        into_page(self.request(Method::POST, "/search", &[], Some(&body)).await?)
    }
}
