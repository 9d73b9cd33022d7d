//! # Caller-side RPC client
//!
//! The counterpart of `courier-rpc-router` on the calling side of the
//! channel: a [`Transport`] capability that moves one opaque string to the
//! peer and back, and an [`RpcClient`] that encodes a typed request into the
//! shared envelope shape, ships it, and decodes the typed reply. Both
//! directions use the router crate's `Envelope`, `Codec`, and `ErrorPayload`
//! definitions, so the two sides can never disagree on the wire format.

pub mod client;
pub mod error;
pub mod transport;

// Re-export main types
pub use client::RpcClient;
pub use error::{ClientError, ClientResult, TransportError};
pub use transport::Transport;
