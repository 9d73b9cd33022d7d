//! Typed call surface over a [`Transport`].

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use courier_rpc_router::{CallContext, Codec, CodecError, Envelope, ErrorPayload, JsonCodec};

use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

/// Caller-side peer of the router: encodes a typed request into an envelope,
/// ships it through the transport, and decodes the typed reply.
pub struct RpcClient<T: Transport, C: Codec = JsonCodec> {
    transport: T,
    codec: C,
}

impl<T: Transport> RpcClient<T, JsonCodec> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            codec: JsonCodec,
        }
    }
}

impl<T: Transport, C: Codec> RpcClient<T, C> {
    /// Builds a client over a non-default codec. Must match the codec the
    /// peer's registry was built with.
    pub fn with_codec(transport: T, codec: C) -> Self {
        Self { transport, codec }
    }

    /// Invokes `procedure` on the peer and decodes its reply.
    ///
    /// A reply payload of the exact shape `{"error":{"message":...}}` (sole
    /// key) is taken as a remote failure and surfaced as
    /// [`ClientError::Remote`]. A procedure whose success output legitimately
    /// uses that exact shape is indistinguishable on the wire.
    pub async fn call<TIn, TOut>(
        &self,
        ctx: CallContext,
        procedure: &str,
        input: &TIn,
    ) -> ClientResult<TOut>
    where
        TIn: Serialize,
        TOut: DeserializeOwned,
    {
        let payload = self
            .codec
            .encode(input)
            .map_err(|err| ClientError::Encode {
                procedure: procedure.to_string(),
                source: err,
            })?;
        let outbound = Envelope::request(procedure, payload)
            .to_json()
            .map_err(|err| ClientError::Encode {
                procedure: procedure.to_string(),
                source: CodecError::Encode(err.into()),
            })?;

        debug!(procedure, "sending call");
        let raw_reply = self.transport.send_message(ctx, outbound).await?;

        let reply: Envelope = serde_json::from_str(&raw_reply)
            .map_err(|err| ClientError::MalformedReply(err.to_string()))?;
        let payload = reply.response.as_deref().ok_or_else(|| {
            ClientError::MalformedReply("reply envelope has no response payload".to_string())
        })?;

        if let Ok(failure) = serde_json::from_str::<ErrorPayload>(payload.get()) {
            return Err(ClientError::Remote {
                procedure: procedure.to_string(),
                message: failure.message().to_string(),
            });
        }

        self.codec.decode(payload).map_err(|err| ClientError::Decode {
            procedure: procedure.to_string(),
            source: err,
        })
    }
}
