//! Error types for event decoding.

use assetmap_types::{AssetName, PayloadError};
use assetmap_wire::{EventField, WireError};

/// Errors raised while decoding an event.
///
/// Every variant means the input was malformed for this reader; no event
/// is produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// The record itself is malformed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// An opaque key or value could not be resolved to its concrete type.
    #[error("cannot resolve {field} of asset '{asset_name}': {source}")]
    Resolve {
        /// The field being resolved.
        field: EventField,
        /// The asset the record belongs to.
        asset_name: AssetName,
        /// Why the conversion failed.
        source: PayloadError,
    },

    /// The resolver has no schema for the record's asset.
    #[error("no schema registered for asset '{0}'")]
    UnknownAsset(AssetName),

    /// The outer kind tag names an event kind this decoder does not read.
    #[error("unsupported event kind: {0}")]
    UnsupportedKind(String),
}

impl EventError {
    /// The field the error is attributed to, when there is one.
    pub const fn field(&self) -> Option<EventField> {
        match self {
            Self::Wire(
                WireError::MissingField(field)
                | WireError::DuplicateField(field)
                | WireError::InvalidField { field, .. },
            )
            | Self::Resolve { field, .. } => Some(*field),
            _ => None,
        }
    }
}
