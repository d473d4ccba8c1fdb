//! Error types for wire-format decoding

use thiserror::Error;

/// A single tagged-value envelope could not be decoded.
///
/// Raised when an envelope violates the one-tag invariant or a scalar
/// payload fails to parse as its declared type. Record decoding recovers
/// from this locally (the affected field is treated as absent); it only
/// surfaces from direct [`crate::Value::from_wire`] calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The envelope is not a JSON object.
    #[error("value envelope must be an object")]
    NotAnObject,

    /// The envelope carries zero or more than one type tag.
    #[error("value envelope must carry exactly one type tag, found {0}")]
    TagCount(usize),

    /// The single tag key is not one of the known value tags.
    #[error("unrecognized value tag `{0}`")]
    UnknownTag(String),

    /// The payload under a known tag does not parse as that type.
    #[error("invalid `{tag}` payload: {message}")]
    InvalidPayload { tag: &'static str, message: String },
}

impl DecodeError {
    pub(crate) fn payload(tag: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload { tag, message: message.into() }
    }
}
