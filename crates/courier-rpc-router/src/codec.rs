//! Pluggable conversion between typed messages and their canonical wire text.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::value::RawValue;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Encode/decode failures, kind-tagged so the router can map them onto its
/// own taxonomy.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("decode: {0}")]
    Decode(BoxError),

    #[error("encode: {0}")]
    Encode(BoxError),
}

/// Converts typed values to and from their canonical wire representation.
///
/// Implementations must be mutual inverses on every value the schema can
/// produce, encode fields under their official names, and ignore unknown
/// fields on decode (the forward-compatibility policy of the canonical JSON
/// mapping).
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Box<RawValue>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, payload: &RawValue) -> Result<T, CodecError>;
}

/// Canonical JSON mapping via serde: renamed fields encode under their
/// official names, unknown fields are ignored on decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Box<RawValue>, CodecError> {
        serde_json::value::to_raw_value(value).map_err(|err| CodecError::Encode(err.into()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &RawValue) -> Result<T, CodecError> {
        serde_json::from_str(payload.get()).map_err(|err| CodecError::Decode(err.into()))
    }
}
