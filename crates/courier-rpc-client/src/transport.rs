//! The string-delivery capability the client runs over.

use async_trait::async_trait;

use courier_rpc_router::CallContext;

use crate::error::TransportError;

/// Moves one opaque envelope string to the peer and returns its reply string.
///
/// Implementations own connection setup and teardown; the client needs only
/// this single capability, so the same trait covers whatever IPC channel the
/// host process uses (pipes, sockets, platform messaging). The router never
/// calls this — on the receiving side an external loop feeds inbound strings
/// to the router and forwards its output back through the same channel.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_message(&self, ctx: CallContext, input: String)
    -> Result<String, TransportError>;
}
