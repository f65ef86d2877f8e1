//! Error types for loading and submitting.

use petclinic_client::ClientError;
use thiserror::Error;

/// Result type for page submit functions.
pub type SubmitResult<T = ()> = Result<T, SubmitError>;

/// Why a load ended in the error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The dependency key was absent; nothing was fetched.
    MissingKey,
    /// The server rejected the request.
    Api { status: u16 },
    /// No response was obtained.
    Transport,
    /// A response arrived but could not be decoded.
    Decode,
    /// Anything else reported by a page-supplied fetch.
    Other,
}

/// A terminal load failure, as shown by the page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl LoadFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing_key(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MissingKey, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Other, message)
    }

    pub fn is_missing_key(&self) -> bool {
        self.kind == FailureKind::MissingKey
    }
}

impl From<ClientError> for LoadFailure {
    fn from(err: ClientError) -> Self {
        let kind = match &err {
            ClientError::Api(api) => FailureKind::Api {
                status: api.status(),
            },
            ClientError::Transport(_) => FailureKind::Transport,
            ClientError::Decode(_) => FailureKind::Decode,
            ClientError::Encode(_) | ClientError::Config(_) => FailureKind::Other,
        };
        Self::new(kind, err.to_string())
    }
}

/// Failure reported by a page-supplied submit function.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request client failed. Only [`ClientError::Api`] carries field
    /// errors.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Form values could not be turned into a request payload.
    #[error(transparent)]
    Payload(#[from] petclinic_types::Error),

    /// Data the page needed before submitting was not there.
    #[error("{0}")]
    Precondition(String),
}

impl SubmitError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}
