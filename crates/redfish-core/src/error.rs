//! Standard Redfish error envelope and model-level errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while interpreting protocol data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Body could not be decoded as a standard error envelope
    #[error("no decodable error information")]
    NoErrorInformation,

    /// The server violated a guarantee of the standard
    #[error("BUG: {0}")]
    Integrity(String),

    /// Caller supplied something the protocol cannot express
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// `{"error": {...}}` as returned with non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(
        rename = "@Message.ExtendedInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub extended_info: Option<Vec<ExtendedInfo>>,
}

/// One entry of `@Message.ExtendedInfo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_args: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_properties: Option<Vec<String>>,
}

impl ErrorEnvelope {
    /// Parse a raw response body as an error envelope.
    pub fn decode(body: &[u8]) -> ModelResult<Self> {
        serde_json::from_slice(body).map_err(|_| ModelError::NoErrorInformation)
    }

    /// Best-effort human readable message.
    ///
    /// Extended info entries are joined with `"; "`, each contributing its
    /// `Message` or, when a vendor omits it, its `MessageId`. Without extended
    /// info the top-level `Message` is used. An empty string means the caller
    /// should fall back to the HTTP status line.
    pub fn human_message(&self) -> String {
        let entries: Vec<&str> = self
            .error
            .extended_info
            .iter()
            .flatten()
            .filter_map(|info| info.message.as_deref().or(info.message_id.as_deref()))
            .collect();

        if !entries.is_empty() {
            return entries.join("; ");
        }

        self.error.message.clone().unwrap_or_default()
    }
}
