//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use courier_rpc_router::prelude::*;
//! ```

pub use crate::codec::{Codec, CodecError, JsonCodec};
pub use crate::context::CallContext;
pub use crate::envelope::Envelope;
pub use crate::error::{ErrorPayload, HandlerError, RegisterError, RouterError, RouterResult};
pub use crate::registry::OperationRegistry;
pub use crate::router::Router;
