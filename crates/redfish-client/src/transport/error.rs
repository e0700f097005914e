//! Transport layer errors

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mock transport has nothing queued for the request
    #[error("No response for {method} {url}")]
    NoResponse { method: String, url: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            Self::InvalidConfig(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::ReceiveFailed(err.to_string())
        } else {
            Self::SendFailed(err.to_string())
        }
    }
}
