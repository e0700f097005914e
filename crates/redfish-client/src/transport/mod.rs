//! HTTP transport for Redfish requests
//!
//! The client only needs to send one request and get one response back; how
//! that happens is behind the [`Transport`] trait:
//! - [`HttpTransport`] talks HTTPS (or plain HTTP) via reqwest
//! - [`MockTransport`] replays canned responses for tests
//!
//! # Example
//!
//! ```ignore
//! use redfish_client::transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new(&config)?;
//! let response = transport
//!     .send(HttpRequest::get("https://bmc01:443/redfish/v1/"))
//!     .await?;
//! ```

pub mod error;
mod http;
pub mod mock;

pub use error::TransportError;
pub use http::HttpTransport;
pub use mock::MockTransport;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

/// Sends a single request and returns the raw response.
///
/// Redirects are never followed; the caller sees every 3xx.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Credentials for HTTP basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A fully resolved request
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub basic_auth: Option<BasicAuth>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            basic_auth: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn basic_auth(mut self, auth: BasicAuth) -> Self {
        self.basic_auth = Some(auth);
        self
    }

    /// Value of a request header, matched case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as JSON
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

// Bodies carry passwords and keys; never print them.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(n, v)| {
                if n.eq_ignore_ascii_case("x-auth-token") {
                    (n.as_str(), "<redacted>")
                } else {
                    (n.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("basic_auth", &self.basic_auth)
            .finish()
    }
}

/// Raw response as seen on the wire
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    /// URL the request was sent to
    pub url: String,
    pub status: u16,
    /// Reason phrase, e.g. "Not Found"
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_json(self, body: &serde_json::Value) -> Self {
        self.with_header("Content-Type", "application/json")
            .with_body(body.to_string())
    }

    /// Header value, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// e.g. `"404 Not Found"`
    pub fn status_line(&self) -> String {
        if self.status_text.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.status_text)
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
