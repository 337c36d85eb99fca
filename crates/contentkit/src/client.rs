//! HTTP client for the Content Delivery API
//!
//! [`Client`] holds a preconfigured HTTP client with the bearer token and
//! user agent installed as default headers, so every request to the space
//! is authenticated the same way. Page fetching is abstracted behind the
//! [`EntrySource`] trait so the pagination logic can be driven by scripted
//! sources in tests.

use crate::error::Error;
use crate::query::Query;
use crate::types::{ApiErrorBody, Page, Space};
use crate::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// Connect timeout for API requests
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum body bytes echoed into decode errors
const SNIPPET_LEN: usize = 120;

/// Source of entry pages
///
/// Implemented by [`Client`] against the live API; test code substitutes
/// scripted sources to exercise pagination without a network.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// Fetch one page of entries for `query` at the given window offset
    async fn entries(&self, query: &Query, skip: u32) -> Result<Page, Error>;
}

/// Builder for [`Client`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    space: String,
    token: String,
    base_url: Option<String>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Space id to pull from
    pub fn space(mut self, space: impl Into<String>) -> Self {
        self.space = space.into();
        self
    }

    /// Delivery API access token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Override the API base URL (useful for previews and tests)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Custom User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> Result<Client, Error> {
        if self.space.is_empty() {
            return Err(Error::MissingSpace);
        }
        if self.token.is_empty() {
            return Err(Error::MissingToken);
        }

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| Error::InvalidToken)?;
        headers.insert(AUTHORIZATION, auth);

        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(Error::ClientBuild)?;

        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Client {
            http,
            space: self.space,
            base_url,
        })
    }
}

/// Authenticated client for one space
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    space: String,
    base_url: String,
}

impl Client {
    /// Create a builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The space id this client pulls from
    pub fn space_id(&self) -> &str {
        &self.space
    }

    /// Fetch the space descriptor, including its locales
    pub async fn space(&self) -> Result<Space, Error> {
        let url = format!("{}/spaces/{}", self.base_url, self.space);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        decode_response(response, "space").await
    }

    /// Fetch one page of entries at the given window offset
    pub async fn entries_page(&self, query: &Query, skip: u32) -> Result<Page, Error> {
        let url = format!("{}/spaces/{}/entries", self.base_url, self.space);
        let response = self
            .http
            .get(&url)
            .query(&query.to_params(skip))
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        let page: Page = decode_response(response, "entries page").await?;
        debug!(
            skip,
            fetched = page.items.len(),
            total = page.total,
            "Fetched entries page"
        );
        Ok(page)
    }
}

#[async_trait]
impl EntrySource for Client {
    async fn entries(&self, query: &Query, skip: u32) -> Result<Page, Error> {
        self.entries_page(query, skip).await
    }
}

/// Decode a response body, mapping non-success statuses to [`Error::Api`]
async fn decode_response<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &'static str,
) -> Result<T, Error> {
    let status = response.status();
    let body = response.bytes().await.map_err(Error::from_reqwest)?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }

    serde_json::from_slice(&body).map_err(|e| Error::Decode {
        context,
        detail: format!("{} (body: {})", e, body_snippet(&body)),
    })
}

/// Build an [`Error::Api`] from an error response body
///
/// The provider returns `{"sys":{"id":...},"message":...,"requestId":...}`;
/// anything unparseable falls back to placeholders so the status code is
/// never lost.
fn api_error(status: u16, body: &Bytes) -> Error {
    let parsed: ApiErrorBody = serde_json::from_slice(body).unwrap_or_default();

    let id = if parsed.sys.id.is_empty() {
        "Unknown".to_string()
    } else {
        parsed.sys.id
    };
    let message = if parsed.message.is_empty() {
        format!("HTTP {}", status)
    } else {
        parsed.message
    };
    let request_id = if parsed.request_id.is_empty() {
        "unknown".to_string()
    } else {
        parsed.request_id
    };

    error!(
        error_id = %id,
        request_id = %request_id,
        status,
        "Contentful API error"
    );

    Error::Api {
        id,
        message,
        request_id,
        status,
    }
}

/// First bytes of a body for error messages, lossily decoded
fn body_snippet(body: &Bytes) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(SNIPPET_LEN)
        .collect()
}
