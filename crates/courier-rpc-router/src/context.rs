//! Per-call context handed through to operation handlers.

use std::collections::HashMap;

use serde_json::Value;

/// Call-scoped metadata passed through to the handler unchanged.
///
/// Cancellation propagates the Rust way: dropping the future returned by
/// [`crate::Router::handle`] cancels the in-flight handler. The router
/// imposes no deadline of its own; a caller wanting one wraps the call in a
/// timeout at the context or transport layer.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Metadata supplied by the host (peer identity, trace ids, ...).
    pub metadata: HashMap<String, Value>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one metadata entry, builder-style.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Looks up a metadata entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}
