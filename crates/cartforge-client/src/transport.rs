//! Transport abstraction over the remote job service.
//!
//! A transport moves one request across the network boundary and hands back
//! the raw status and body. Non-2xx statuses are returned, not raised: each
//! call site in the client decides what a given status means.

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::JobError;

/// Placeholder origin used to percent-encode paths and queries.
pub(crate) const ENCODING_ORIGIN: &str = "http://relay.invalid";

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request against the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Absolute API path, e.g. `/api/conversations`.
    pub path: String,
    /// Query parameters, encoded by the transport.
    pub query: Vec<(String, String)>,
    /// JSON body; ignored for GET.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Create a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Path with the percent-encoded query string appended.
    pub fn path_and_query(&self) -> Result<String, JobError> {
        let mut url = Url::parse(ENCODING_ORIGIN).map_err(|e| JobError::Protocol(e.to_string()))?;
        url.set_path(&self.path);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
    }
}

/// Raw response from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Sends API requests to the remote job service.
///
/// Implementations must be safe to share between concurrently running jobs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response.
    ///
    /// Errors are reserved for failures to obtain any response at all.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, JobError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_without_query() {
        let req = ApiRequest::get("/api/conversations/abc");
        assert_eq!(req.path_and_query().unwrap(), "/api/conversations/abc");
    }

    #[test]
    fn test_query_is_encoded() {
        let req = ApiRequest::get("/api/conversations/abc/select-file")
            .with_query("file", "src/my game&more.lua");
        assert_eq!(
            req.path_and_query().unwrap(),
            "/api/conversations/abc/select-file?file=src%2Fmy+game%26more.lua"
        );
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(serde_json::to_string(&HttpMethod::Get).unwrap(), r#""GET""#);
        assert_eq!(serde_json::to_string(&HttpMethod::Post).unwrap(), r#""POST""#);
    }

    #[test]
    fn test_response_helpers() {
        let ok = ApiResponse::new(201, json!({"a": 1}).to_string());
        assert!(ok.is_success());
        assert_eq!(ok.json::<Value>().unwrap()["a"], 1);

        let missing = ApiResponse::new(404, "");
        assert!(!missing.is_success());
        assert!(missing.json::<Value>().is_err());
    }
}
