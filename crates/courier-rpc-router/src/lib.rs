//! # Typed operation router
//!
//! A transport-agnostic bridge between an untyped, string-based IPC channel
//! and a set of strongly-typed service methods. The router receives a JSON
//! envelope naming a procedure and carrying an encoded request payload,
//! resolves the procedure to a statically-typed handler, decodes the payload
//! into the handler's input type, invokes it, and encodes the output back
//! into a reply envelope.
//!
//! ## Features
//! - Generic registration: handler input/output types are checked at compile
//!   time, erased into a uniform registry entry at registration time
//! - Pluggable [`Codec`] with a canonical JSON implementation
//! - Five-kind failure taxonomy plus symmetric wire-level error delivery
//! - No transport code: an external loop feeds strings in and ships the
//!   results back out

pub mod codec;
pub mod context;
pub mod envelope;
pub mod error;
pub mod prelude;
pub mod registry;
pub mod router;

// Re-export main types
pub use codec::{Codec, CodecError, JsonCodec};
pub use context::CallContext;
pub use envelope::Envelope;
pub use error::{ErrorPayload, HandlerError, RegisterError, RouterError, RouterResult};
pub use registry::OperationRegistry;
pub use router::Router;
