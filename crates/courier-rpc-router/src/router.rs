//! The dispatch pipeline: envelope decode → registry lookup → payload decode
//! → handler invocation → payload encode → envelope encode.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::codec::{Codec, CodecError, JsonCodec};
use crate::context::CallContext;
use crate::envelope::Envelope;
use crate::error::{ErrorPayload, HandlerError, RegisterError, RouterError, RouterResult};
use crate::registry::OperationRegistry;

/// Receiver-side dispatcher over an [`OperationRegistry`].
///
/// [`Router::handle`] takes `&self` and is safe to call from any number of
/// tasks at once; each call is fully independent. The router performs no
/// retries, imposes no timeouts, and never touches the transport — an
/// external loop feeds it inbound strings and forwards its output back out
/// through whatever channel the host owns.
pub struct Router<C: Codec = JsonCodec> {
    registry: OperationRegistry<C>,
}

impl Router<JsonCodec> {
    pub fn new() -> Self {
        Self {
            registry: OperationRegistry::new(),
        }
    }
}

impl Default for Router<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Router<C> {
    /// Wraps an already-populated registry.
    pub fn with_registry(registry: OperationRegistry<C>) -> Self {
        Self { registry }
    }

    /// Registers `handler` under `name`. See [`OperationRegistry::register`].
    pub fn register<TIn, TOut, F, Fut>(
        &mut self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<(), RegisterError>
    where
        TIn: DeserializeOwned + Send + 'static,
        TOut: Serialize + Send + 'static,
        F: Fn(CallContext, TIn) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<TOut, HandlerError>> + Send + 'static,
    {
        self.registry.register(name, handler)
    }

    /// The registry backing this router.
    pub fn registry(&self) -> &OperationRegistry<C> {
        &self.registry
    }

    /// Dispatches one inbound envelope string and returns the reply string.
    ///
    /// Failures surface synchronously as [`RouterError`]; nothing is retried
    /// or suppressed, and no reply is produced for a failed call. Use
    /// [`Router::handle_message`] to deliver failures to the peer instead.
    pub async fn handle(&self, ctx: CallContext, input: &str) -> RouterResult<String> {
        let envelope = Envelope::from_json(input)?;
        let payload = envelope.inbound_payload()?;

        let entry = match self.registry.lookup(&envelope.procedure) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(procedure = %envelope.procedure, "unknown operation");
                return Err(err);
            }
        };
        debug!(
            procedure = %envelope.procedure,
            input_type = entry.input_type(),
            "dispatching operation"
        );

        let response = entry.invoke(ctx, payload).await?;
        let reply = Envelope::response(envelope.procedure.clone(), response);
        reply.to_json().map_err(|err| RouterError::ResponseEncode {
            procedure: envelope.procedure,
            source: CodecError::Encode(err.into()),
        })
    }

    /// Like [`Router::handle`], but delivers failures to the peer as a
    /// well-formed reply envelope carrying an [`ErrorPayload`], so success
    /// and failure travel in one shape the peer can always parse.
    ///
    /// The reply is addressed to the procedure the failure relates to; for
    /// well-formedness failures it is recovered from the inbound envelope.
    /// When no procedure is recoverable (the input did not parse as an
    /// envelope, or its procedure was empty) there is nothing to address a
    /// reply to, and the failure surfaces locally as `Err` instead.
    pub async fn handle_message(&self, ctx: CallContext, input: &str) -> RouterResult<String> {
        let err = match self.handle(ctx, input).await {
            Ok(reply) => return Ok(reply),
            Err(err) => err,
        };

        let procedure = match err.procedure() {
            Some(procedure) => procedure.to_string(),
            None => match recover_procedure(input) {
                Some(procedure) => procedure,
                None => return Err(err),
            },
        };
        let payload = serde_json::value::to_raw_value(&ErrorPayload::from(&err)).map_err(
            |encode_err| RouterError::ResponseEncode {
                procedure: procedure.clone(),
                source: CodecError::Encode(encode_err.into()),
            },
        )?;
        let reply = Envelope::response(procedure.clone(), payload);
        reply
            .to_json()
            .map_err(|encode_err| RouterError::ResponseEncode {
                procedure,
                source: CodecError::Encode(encode_err.into()),
            })
    }
}

/// Best-effort recovery of the procedure name from an inbound string whose
/// envelope failed the well-formedness checks.
fn recover_procedure(input: &str) -> Option<String> {
    let envelope: Envelope = serde_json::from_str(input).ok()?;
    if envelope.procedure.is_empty() {
        None
    } else {
        Some(envelope.procedure)
    }
}
