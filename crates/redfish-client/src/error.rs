//! Error types for Redfish client operations

use redfish_core::{ErrorEnvelope, Flavor, ModelError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::{HttpResponse, TransportError};

/// Result type alias for Redfish client operations
pub type Result<T> = std::result::Result<T, RedfishClientError>;

/// Broad classes of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, TLS or timeout failure, or an unexpected HTTP status
    Transport,
    /// The server did not honor the standard
    Integrity,
    /// The request was refused, by the server or before it was sent
    Rejected,
}

/// Errors that can occur during Redfish client operations
#[derive(Error, Debug)]
pub enum RedfishClientError {
    /// Request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-success status without usable error information
    #[error("HTTP {method} for {url} returned \"{status}\"")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: String,
    },

    /// Required protocol data is missing or malformed
    #[error("BUG: {0}")]
    Integrity(String),

    /// Response body could not be decoded
    #[error("Failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },

    /// Server refused the request with an error message
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Operation not available for the resolved vendor flavor
    #[error("{operation} is not supported for vendor flavor {flavor}")]
    Unsupported { flavor: Flavor, operation: String },

    /// Caller input rejected before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation needs a session but none is established
    #[error("No authentication token found, is the session set up?")]
    NotAuthenticated,

    /// Endpoints have not been discovered yet
    #[error("Client is not initialised, run discovery first")]
    NotInitialised,

    /// SessionService reports `ServiceEnabled: false`
    #[error("Session service at {0} is disabled")]
    SessionServiceDisabled(String),

    /// Named entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// No CSR has been generated, or generation is still running
    #[error("No certificate signing request available")]
    CsrNotAvailable,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RedfishClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::UnexpectedStatus { .. } | Self::Config(_) => {
                ErrorKind::Transport
            }
            Self::Integrity(_) | Self::Parse { .. } => ErrorKind::Integrity,
            Self::Rejected { .. }
            | Self::Unsupported { .. }
            | Self::InvalidRequest(_)
            | Self::NotAuthenticated
            | Self::NotInitialised
            | Self::SessionServiceDisabled(_)
            | Self::NotFound(_)
            | Self::CsrNotAvailable => ErrorKind::Rejected,
        }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// Status error that ignores any error body
    pub fn unexpected_status(method: &str, response: &HttpResponse) -> Self {
        Self::UnexpectedStatus {
            method: method.to_string(),
            url: response.url.clone(),
            status: response.status_line(),
        }
    }

    pub fn unsupported(flavor: Flavor, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            flavor,
            operation: operation.into(),
        }
    }

    /// Error for a response whose status was not acceptable.
    ///
    /// Uses the standard error envelope when the body carries one with a
    /// message, the raw status line otherwise.
    pub fn from_response(method: &str, response: &HttpResponse) -> Self {
        let message = ErrorEnvelope::decode(&response.body)
            .map(|envelope| envelope.human_message())
            .unwrap_or_default();

        if message.is_empty() {
            Self::unexpected_status(method, response)
        } else {
            Self::Rejected {
                status: response.status,
                message,
            }
        }
    }
}

impl From<ModelError> for RedfishClientError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Integrity(message) => Self::Integrity(message),
            ModelError::InvalidRequest(message) => Self::InvalidRequest(message),
            ModelError::NoErrorInformation => {
                Self::Integrity("no decodable error information".to_string())
            }
        }
    }
}
