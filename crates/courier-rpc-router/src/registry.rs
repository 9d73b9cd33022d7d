//! Procedure-name → typed-handler mapping with type-erased storage.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;

use crate::codec::{Codec, JsonCodec};
use crate::context::CallContext;
use crate::error::{HandlerError, RegisterError, RouterError};

/// Type-erased dispatch closure. The concrete input/output types are
/// monomorphized into it at registration time: it decodes the raw payload,
/// invokes the typed handler, and encodes the output. Recovering which
/// closure to call from the procedure name is the only runtime type step
/// left on the dispatch path.
type ErasedCall = Box<
    dyn Fn(CallContext, &RawValue) -> BoxFuture<'static, Result<Box<RawValue>, RouterError>>
        + Send
        + Sync,
>;

/// One registered operation. Input/output type names are recorded for
/// diagnostics only; the types themselves live inside the erased closure.
pub struct OperationEntry {
    call: ErasedCall,
    input_type: &'static str,
    output_type: &'static str,
}

impl OperationEntry {
    pub(crate) fn invoke(
        &self,
        ctx: CallContext,
        payload: &RawValue,
    ) -> BoxFuture<'static, Result<Box<RawValue>, RouterError>> {
        (self.call)(ctx, payload)
    }

    pub fn input_type(&self) -> &'static str {
        self.input_type
    }

    pub fn output_type(&self) -> &'static str {
        self.output_type
    }
}

impl fmt::Debug for OperationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationEntry")
            .field("input_type", &self.input_type)
            .field("output_type", &self.output_type)
            .finish_non_exhaustive()
    }
}

/// Registry mapping fully-qualified procedure names to their handlers.
///
/// Registration takes `&mut self` and lookup takes `&self`, so a registry
/// shared across tasks is immutable by construction: finish registering,
/// then hand out references. A host that wants to interleave registration
/// with dispatch must add its own lock around the whole registry.
pub struct OperationRegistry<C: Codec = JsonCodec> {
    codec: Arc<C>,
    entries: HashMap<String, OperationEntry>,
}

impl OperationRegistry<JsonCodec> {
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl Default for OperationRegistry<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> OperationRegistry<C> {
    /// Builds a registry over a non-default codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
            entries: HashMap::new(),
        }
    }

    /// Registers `handler` under `name`.
    ///
    /// Fails on an empty name and on a name already taken, so accidental
    /// collisions surface at startup instead of silently overwriting.
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
        let name = name.into();
        if name.is_empty() {
            return Err(RegisterError::EmptyName);
        }
        if self.entries.contains_key(&name) {
            return Err(RegisterError::Duplicate(name));
        }

        let codec = Arc::clone(&self.codec);
        let procedure = name.clone();
        let call: ErasedCall = Box::new(move |ctx: CallContext, payload: &RawValue| {
            // Decode synchronously so the returned future borrows nothing.
            let input: TIn = match codec.decode(payload) {
                Ok(input) => input,
                Err(err) => {
                    return future::err(RouterError::RequestDecode {
                        procedure: procedure.clone(),
                        source: err,
                    })
                    .boxed();
                }
            };
            let fut = handler(ctx, input);
            let codec = Arc::clone(&codec);
            let procedure = procedure.clone();
            async move {
                let output = fut.await.map_err(|err| RouterError::Handler {
                    procedure: procedure.clone(),
                    source: err,
                })?;
                codec
                    .encode(&output)
                    .map_err(|err| RouterError::ResponseEncode {
                        procedure,
                        source: err,
                    })
            }
            .boxed()
        });

        self.entries.insert(
            name,
            OperationEntry {
                call,
                input_type: std::any::type_name::<TIn>(),
                output_type: std::any::type_name::<TOut>(),
            },
        );
        Ok(())
    }

    /// Looks up the entry registered under `procedure`.
    pub fn lookup(&self, procedure: &str) -> Result<&OperationEntry, RouterError> {
        self.entries
            .get(procedure)
            .ok_or_else(|| RouterError::UnknownOperation {
                procedure: procedure.to_string(),
            })
    }

    pub fn contains(&self, procedure: &str) -> bool {
        self.entries.contains_key(procedure)
    }

    /// Names of every registered operation, in no particular order.
    pub fn operations(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Codec> fmt::Debug for OperationRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
