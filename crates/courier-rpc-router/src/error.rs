//! Failure taxonomy and the wire shape used to report it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::CodecError;

/// Result alias for dispatch operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Everything that can go wrong while dispatching one call.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Inbound string was not a valid envelope, or the procedure was empty.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// No handler registered under the requested procedure name.
    #[error("no operation registered for '{procedure}'")]
    UnknownOperation { procedure: String },

    /// Request payload did not decode into the registered input type.
    #[error("failed to decode request for '{procedure}': {source}")]
    RequestDecode {
        procedure: String,
        source: CodecError,
    },

    /// The handler itself reported failure.
    #[error("operation '{procedure}' failed: {source}")]
    Handler {
        procedure: String,
        source: HandlerError,
    },

    /// The handler's output failed to encode. Signals a type/schema defect
    /// in the registered operation rather than a caller input problem.
    #[error("failed to encode response for '{procedure}': {source}")]
    ResponseEncode {
        procedure: String,
        source: CodecError,
    },
}

impl RouterError {
    /// The procedure the failure relates to, where one is known.
    pub fn procedure(&self) -> Option<&str> {
        match self {
            RouterError::MalformedEnvelope(_) => None,
            RouterError::UnknownOperation { procedure }
            | RouterError::RequestDecode { procedure, .. }
            | RouterError::Handler { procedure, .. }
            | RouterError::ResponseEncode { procedure, .. } => Some(procedure),
        }
    }
}

/// Registration-phase failures; never produced during dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("operation name must not be empty")]
    EmptyName,

    #[error("operation '{0}' is already registered")]
    Duplicate(String),
}

/// Failure reported by an operation handler, carrying one human-readable
/// message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Wire shape for reporting a failure inside a reply envelope, so success and
/// failure travel in one envelope shape. Constructed only at the moment an
/// error must cross the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorPayload {
    pub error: ErrorMessage,
}

/// The single human-readable message nested under the `error` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl From<&RouterError> for ErrorPayload {
    fn from(err: &RouterError) -> Self {
        Self::new(err.to_string())
    }
}
