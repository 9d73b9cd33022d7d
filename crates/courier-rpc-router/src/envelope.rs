//! Wire-level envelope carrying one procedure call or one reply.

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::RouterError;

/// The JSON wrapper moved across the transport in both directions.
///
/// A well-formed inbound envelope carries `procedure` and `request`; a
/// well-formed outbound envelope carries `procedure` and `response`. Both
/// payloads present, or both absent, is malformed. Payloads stay opaque
/// (`RawValue`) until the registry has resolved the concrete types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Fully-qualified operation name, convention `"<package>.<Service>/<Method>"`.
    pub procedure: String,

    /// Encoded request payload, present on the call direction only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Box<RawValue>>,

    /// Encoded response payload, present on the reply direction only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Box<RawValue>>,
}

impl Envelope {
    /// Builds a call-direction envelope.
    pub fn request(procedure: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self {
            procedure: procedure.into(),
            request: Some(payload),
            response: None,
        }
    }

    /// Builds a reply-direction envelope.
    pub fn response(procedure: impl Into<String>, payload: Box<RawValue>) -> Self {
        Self {
            procedure: procedure.into(),
            request: None,
            response: Some(payload),
        }
    }

    /// Parses an envelope from its wire text.
    pub fn from_json(input: &str) -> Result<Self, RouterError> {
        let envelope: Self = serde_json::from_str(input)
            .map_err(|err| RouterError::MalformedEnvelope(err.to_string()))?;
        if envelope.procedure.is_empty() {
            return Err(RouterError::MalformedEnvelope(
                "procedure must not be empty".to_string(),
            ));
        }
        Ok(envelope)
    }

    /// Serializes the envelope to its wire text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Returns the request payload of a well-formed inbound envelope.
    pub fn inbound_payload(&self) -> Result<&RawValue, RouterError> {
        match (self.request.as_deref(), self.response.as_deref()) {
            (Some(request), None) => Ok(request),
            (Some(_), Some(_)) => Err(RouterError::MalformedEnvelope(
                "envelope carries both a request and a response payload".to_string(),
            )),
            (None, Some(_)) => Err(RouterError::MalformedEnvelope(
                "inbound envelope carries a response payload".to_string(),
            )),
            (None, None) => Err(RouterError::MalformedEnvelope(
                "envelope carries neither a request nor a response payload".to_string(),
            )),
        }
    }
}
