//! Error types for caller-side operations.

use thiserror::Error;

use courier_rpc_router::CodecError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures surfaced by [`crate::RpcClient::call`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed to deliver the call or produce a reply.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request could not be encoded into an envelope.
    #[error("failed to encode request for '{procedure}': {source}")]
    Encode {
        procedure: String,
        source: CodecError,
    },

    /// The peer's reply was not a well-formed reply envelope.
    #[error("malformed reply: {0}")]
    MalformedReply(String),

    /// The reply payload did not decode into the expected output type.
    #[error("failed to decode response for '{procedure}': {source}")]
    Decode {
        procedure: String,
        source: CodecError,
    },

    /// The peer reported a failure for this call.
    #[error("remote error from '{procedure}': {message}")]
    Remote { procedure: String, message: String },
}

/// Delivery failure from the underlying string transport.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
