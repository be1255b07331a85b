//! Field-keyed wire format for assetmap change events.
//!
//! Events are written as self-describing records: a CBOR map whose keys
//! are field names and whose values are either text, booleans, or opaque
//! typed objects ([`Payload`]). Field names are authoritative, not
//! position, so a reader accepts the fields in any order.
//!
//! # Layout
//!
//! ```text
//! frame   := u32 big-endian length || record
//! record  := CBOR map { field-name => field-value }
//! value   := null (absent) | bool | int | float | text | bytes
//!          | [type-tag, body-bytes]   (typed object)
//! ```
//!
//! # Modules
//!
//! - [`field`] -- [`EventField`], the shared field names of the event family
//! - [`cbor`] -- [`CborWireOut`] / [`CborWireIn`], the CBOR record codec
//! - [`frame`] -- Length-prefixed framing for event logs
//! - [`limits`] -- [`WireLimits`] applied while decoding
//! - [`error`] -- [`WireError`]

pub mod cbor;
pub mod error;
pub mod field;
pub mod frame;
pub mod limits;

use assetmap_types::Payload;

// Re-export primary types at crate root.
pub use cbor::{CborWireIn, CborWireOut};
pub use error::WireError;
pub use field::EventField;
pub use frame::{FrameReader, write_frame};
pub use limits::WireLimits;

/// Writing side of the wire: `write(field, value)`.
pub trait WireOut {
    /// Write a text field.
    fn write_text(&mut self, field: EventField, value: &str) -> Result<(), WireError>;

    /// Write a boolean field.
    fn write_bool(&mut self, field: EventField, value: bool) -> Result<(), WireError>;

    /// Write an opaque typed object. `None` is written as an explicit
    /// absent marker, never as a default value.
    fn write_object(&mut self, field: EventField, value: Option<&Payload>)
    -> Result<(), WireError>;
}

/// Reading side of the wire: `read(field) -> value`.
///
/// Each field can be taken once; a second read of the same field sees it
/// as missing.
pub trait WireIn {
    /// Whether the record carries `field` at all (absent markers count).
    fn contains(&self, field: EventField) -> bool;

    /// Read a required text field.
    fn read_text(&mut self, field: EventField) -> Result<String, WireError>;

    /// Read an optional boolean field. `Ok(None)` when the field is missing.
    fn read_bool(&mut self, field: EventField) -> Result<Option<bool>, WireError>;

    /// Read an opaque typed object. `Ok(None)` when the field is missing or
    /// carries the absent marker.
    fn read_object(&mut self, field: EventField) -> Result<Option<Payload>, WireError>;

    /// Read an opaque typed object that must be present.
    fn require_object(&mut self, field: EventField) -> Result<Payload, WireError> {
        self.read_object(field)?
            .ok_or(WireError::MissingField(field))
    }
}
