//! reqwest-backed transports.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::JobError;
use crate::transport::{ApiRequest, ApiResponse, HttpMethod, Transport};

/// Header carrying the session API key on direct requests.
pub const API_KEY_HEADER: &str = "X-Session-API-Key";

/// Default base URL of the hosted job service.
pub const DEFAULT_BASE_URL: &str = "https://app.all-hands.dev";

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, JobError> {
    Ok(reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?)
}

async fn into_api_response(response: reqwest::Response) -> Result<ApiResponse, JobError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(ApiResponse::new(status, body))
}

/// Envelope understood by the relay endpoint.
#[derive(Debug, Serialize)]
struct RelayEnvelope<'a> {
    path: String,
    method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a Value>,
}

/// Sends every request through a single relay endpoint.
///
/// The relay forwards `{path, method, body}` upstream, attaches credentials
/// on its side, and replies with the upstream status and body.
#[derive(Debug, Clone)]
pub struct RelayTransport {
    inner: reqwest::Client,
    relay_url: String,
}

impl RelayTransport {
    /// Create a relay transport.
    pub fn new(relay_url: &str, config: &ClientConfig) -> Result<Self, JobError> {
        Ok(Self {
            inner: build_http_client(config)?,
            relay_url: relay_url.to_string(),
        })
    }
}

#[async_trait]
impl Transport for RelayTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JobError> {
        let envelope = RelayEnvelope {
            path: request.path_and_query()?,
            method: request.method,
            body: request.body.as_ref(),
        };
        debug!(
            relay = %self.relay_url,
            path = %envelope.path,
            method = ?envelope.method,
            "Relay request"
        );

        let response = self
            .inner
            .post(&self.relay_url)
            .json(&envelope)
            .send()
            .await?;
        into_api_response(response).await
    }
}

/// Talks to the job service directly.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    inner: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl DirectTransport {
    /// Create a direct transport against `base_url`.
    pub fn new(base_url: &str, config: &ClientConfig) -> Result<Self, JobError> {
        Ok(Self {
            inner: build_http_client(config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Attach a session API key to every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JobError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(url = %url, method = ?request.method, "HTTP request");

        let mut builder = match request.method {
            HttpMethod::Get => self.inner.get(&url),
            HttpMethod::Post => self.inner.post(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        if let (HttpMethod::Post, Some(body)) = (request.method, &request.body) {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        into_api_response(response).await
    }
}
