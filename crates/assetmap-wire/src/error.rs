//! Error types for the wire layer.
//!
//! Every decode failure aborts the whole record. A [`WireError`] is never
//! accompanied by a partially decoded event.

use crate::field::EventField;

/// Errors raised while writing or reading an event record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A required field is missing or carries the absent marker.
    #[error("missing required field: {0}")]
    MissingField(EventField),

    /// A field holds a value of the wrong wire type.
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: EventField,
        /// What was wrong with it.
        reason: String,
    },

    /// The same field appears twice in one record.
    #[error("duplicate field: {0}")]
    DuplicateField(EventField),

    /// A field name that no event kind defines, rejected by the limits.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The record uses an indefinite-length CBOR item.
    #[error("indefinite-length CBOR not allowed")]
    IndefiniteLength,

    /// The input ended in the middle of a record or frame.
    #[error("input truncated mid-record")]
    Truncated,

    /// Bytes remain after the end of the record.
    #[error("trailing bytes after record")]
    TrailingBytes,

    /// A configured decode limit was exceeded.
    #[error("decode limit exceeded: {0}")]
    LimitExceeded(&'static str),

    /// The input is not a well-formed record.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The encoder failed.
    #[error("encode error: {0}")]
    Encode(String),
}

impl From<minicbor::decode::Error> for WireError {
    fn from(err: minicbor::decode::Error) -> Self {
        if err.is_end_of_input() {
            Self::Truncated
        } else {
            Self::Malformed(err.to_string())
        }
    }
}
