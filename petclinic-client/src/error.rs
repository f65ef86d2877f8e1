//! Error types for the request client.

use crate::client::Payload;
use petclinic_types::FieldErrors;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// One rejected input, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrorPayload {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

/// The structured body of a rejected request.
///
/// Only built when the error body is a JSON object. `body` keeps the whole
/// object so callers can read server-specific keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorPayload {
    pub message: Option<String>,
    pub field_errors: Vec<FieldErrorPayload>,
    pub body: Map<String, Value>,
}

impl ApiErrorPayload {
    /// Interprets a decoded response body. Returns `None` unless the body is
    /// a JSON object. A malformed `fieldErrors` entry is skipped; the other
    /// entries are kept.
    pub fn from_body(body: &Payload) -> Option<Self> {
        let Payload::Json(Value::Object(map)) = body else {
            return None;
        };

        let message = map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let field_errors = map
            .get("fieldErrors")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| FieldErrorPayload::deserialize(e).ok())
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            message,
            field_errors,
            body: map.clone(),
        })
    }

    /// Field errors keyed by field name. Entries without a field name are
    /// dropped; a repeated field keeps its last message.
    pub fn field_error_map(&self) -> FieldErrors {
        self.field_errors
            .iter()
            .filter(|e| !e.field.is_empty())
            .map(|e| (e.field.clone(), e.message.clone()))
            .collect()
    }
}

/// A completed HTTP exchange that ended with a non-2xx status.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    status: u16,
    message: String,
    payload: Option<ApiErrorPayload>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, payload: Option<ApiErrorPayload>) -> Self {
        Self {
            status,
            message: message.into(),
            payload,
        }
    }

    /// Classifies a rejected response. The message is the payload's
    /// `message` when it has one, otherwise the status phrase.
    pub(crate) fn from_response(status: StatusCode, body: &Payload) -> Self {
        let payload = ApiErrorPayload::from_body(body);
        let message = payload
            .as_ref()
            .and_then(|p| p.message.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        Self::new(status.as_u16(), message, payload)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&ApiErrorPayload> {
        self.payload.as_ref()
    }

    /// Server-reported field errors, empty when there is no payload.
    pub fn field_errors(&self) -> FieldErrors {
        self.payload
            .as_ref()
            .map(ApiErrorPayload::field_error_map)
            .unwrap_or_default()
    }
}

/// Errors that can occur in client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was obtained (DNS, refused connection, timeout).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body could not be decoded into the requested type.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),

    /// The client could not be constructed.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns the [`ApiError`] if this failure came from a server response.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status, only for [`ClientError::Api`].
    pub fn status(&self) -> Option<u16> {
        self.as_api().map(ApiError::status)
    }
}
