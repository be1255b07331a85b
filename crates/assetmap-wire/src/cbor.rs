//! CBOR record codec.
//!
//! [`CborWireOut`] buffers fields as they are written and emits one
//! definite-length map on [`CborWireOut::finish`]. [`CborWireIn`] parses
//! and validates the entire record up front, so readers only ever see a
//! record that decoded completely. Both sides apply the same
//! [`WireLimits`], so anything the writer accepts the reader accepts too.

use std::collections::{BTreeMap, BTreeSet};

use assetmap_types::{Payload, TypeTag};
use bytes::Bytes;
use minicbor::data::Type;
use minicbor::{Decoder, Encoder};

use crate::error::WireError;
use crate::field::EventField;
use crate::limits::WireLimits;
use crate::{WireIn, WireOut};

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Writes one record as a CBOR map keyed by field name.
#[derive(Debug, Default)]
pub struct CborWireOut {
    entries: Vec<u8>,
    written: BTreeSet<EventField>,
    limits: WireLimits,
}

impl CborWireOut {
    /// Start an empty record bounded by the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty record bounded by `limits`.
    pub fn with_limits(limits: &WireLimits) -> Self {
        Self {
            limits: limits.clone(),
            ..Self::default()
        }
    }

    /// Close the record and return its encoded bytes.
    ///
    /// Fails with [`WireError::LimitExceeded`] when the record carries more
    /// fields or more bytes than a reader with the same limits accepts.
    pub fn finish(self) -> Result<Bytes, WireError> {
        if self.written.len() > self.limits.max_map_entries {
            return Err(WireError::LimitExceeded("max_map_entries"));
        }
        let len = u64::try_from(self.written.len())
            .map_err(|e| WireError::Encode(format!("field count: {e}")))?;
        let mut out = Vec::with_capacity(self.entries.len().saturating_add(9));
        Encoder::new(&mut out).map(len).map_err(encode_error)?;
        out.extend_from_slice(&self.entries);
        if out.len() > self.limits.max_frame_bytes {
            return Err(WireError::LimitExceeded("max_frame_bytes"));
        }
        Ok(Bytes::from(out))
    }

    const fn check_text(&self, text: &str) -> Result<(), WireError> {
        if text.len() > self.limits.max_text_len {
            return Err(WireError::LimitExceeded("max_text_len"));
        }
        Ok(())
    }

    const fn check_bytes(&self, bytes: &[u8]) -> Result<(), WireError> {
        if bytes.len() > self.limits.max_bytes_len {
            return Err(WireError::LimitExceeded("max_bytes_len"));
        }
        Ok(())
    }

    fn check_payload(&self, payload: &Payload) -> Result<(), WireError> {
        match payload {
            Payload::Bool(_) | Payload::Int(_) | Payload::Float(_) => Ok(()),
            Payload::Text(text) => self.check_text(text),
            Payload::Bytes(bytes) => self.check_bytes(bytes),
            Payload::Typed { tag, body } => {
                self.check_text(tag.as_str())?;
                self.check_bytes(body)
            }
        }
    }

    /// Claim `field` and return an encoder positioned after its name.
    fn begin(&mut self, field: EventField) -> Result<Encoder<&mut Vec<u8>>, WireError> {
        self.check_text(field.as_str())?;
        if !self.written.insert(field) {
            return Err(WireError::DuplicateField(field));
        }
        let mut enc = Encoder::new(&mut self.entries);
        enc.str(field.as_str()).map_err(encode_error)?;
        Ok(enc)
    }
}

impl WireOut for CborWireOut {
    fn write_text(&mut self, field: EventField, value: &str) -> Result<(), WireError> {
        self.check_text(value)?;
        self.begin(field)?.str(value).map_err(encode_error)?;
        Ok(())
    }

    fn write_bool(&mut self, field: EventField, value: bool) -> Result<(), WireError> {
        self.begin(field)?.bool(value).map_err(encode_error)?;
        Ok(())
    }

    fn write_object(
        &mut self,
        field: EventField,
        value: Option<&Payload>,
    ) -> Result<(), WireError> {
        if let Some(payload) = value {
            self.check_payload(payload)?;
        }
        let mut enc = self.begin(field)?;
        let written = match value {
            None => enc.null(),
            Some(Payload::Bool(b)) => enc.bool(*b),
            Some(Payload::Int(i)) => enc.i64(*i),
            Some(Payload::Float(x)) => enc.f64(*x),
            Some(Payload::Text(text)) => enc.str(text),
            Some(Payload::Bytes(bytes)) => enc.bytes(bytes),
            Some(Payload::Typed { tag, body }) => enc
                .array(2)
                .and_then(|enc| enc.str(tag.as_str()))
                .and_then(|enc| enc.bytes(body)),
        };
        written.map_err(encode_error)?;
        Ok(())
    }
}

fn encode_error<E: core::fmt::Display>(err: minicbor::encode::Error<E>) -> WireError {
    WireError::Encode(err.to_string())
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A fully parsed record, read field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct CborWireIn {
    fields: BTreeMap<EventField, Option<Payload>>,
}

impl CborWireIn {
    /// Parse one record.
    ///
    /// Fails if the record is truncated, has trailing bytes, repeats a
    /// field, uses an unsupported CBOR item, or exceeds `limits`.
    pub fn parse(bytes: &[u8], limits: &WireLimits) -> Result<Self, WireError> {
        if bytes.len() > limits.max_frame_bytes {
            tracing::warn!(
                len = bytes.len(),
                max = limits.max_frame_bytes,
                "record rejected: too large"
            );
            return Err(WireError::LimitExceeded("max_frame_bytes"));
        }

        let mut dec = Decoder::new(bytes);
        let len = dec.map()?.ok_or(WireError::IndefiniteLength)?;
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= limits.max_map_entries)
            .ok_or(WireError::LimitExceeded("max_map_entries"))?;

        let mut fields = BTreeMap::new();
        for _ in 0..len {
            let name = decode_text(&mut dec, limits)?;
            let Some(field) = EventField::from_name(name) else {
                if limits.reject_unknown_fields {
                    return Err(WireError::UnknownField(name.to_owned()));
                }
                tracing::debug!(field = name, "skipping unknown field");
                dec.skip()?;
                continue;
            };
            let value = decode_value(&mut dec, limits, field)?;
            if fields.insert(field, value).is_some() {
                return Err(WireError::DuplicateField(field));
            }
        }

        if dec.position() != bytes.len() {
            return Err(WireError::TrailingBytes);
        }
        Ok(Self { fields })
    }

    /// Number of known fields present in the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record carries no known fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl WireIn for CborWireIn {
    fn contains(&self, field: EventField) -> bool {
        self.fields.contains_key(&field)
    }

    fn read_text(&mut self, field: EventField) -> Result<String, WireError> {
        match self.fields.remove(&field).flatten() {
            Some(Payload::Text(text)) => Ok(text),
            Some(other) => Err(wrong_type(field, "text", &other)),
            None => Err(WireError::MissingField(field)),
        }
    }

    fn read_bool(&mut self, field: EventField) -> Result<Option<bool>, WireError> {
        match self.fields.remove(&field) {
            None => Ok(None),
            Some(Some(Payload::Bool(b))) => Ok(Some(b)),
            Some(Some(other)) => Err(wrong_type(field, "bool", &other)),
            Some(None) => Err(WireError::InvalidField {
                field,
                reason: "expected bool, got null".to_owned(),
            }),
        }
    }

    fn read_object(&mut self, field: EventField) -> Result<Option<Payload>, WireError> {
        Ok(self.fields.remove(&field).flatten())
    }
}

fn wrong_type(field: EventField, expected: &str, actual: &Payload) -> WireError {
    WireError::InvalidField {
        field,
        reason: format!("expected {expected}, got {}", actual.tag()),
    }
}

fn decode_value(
    dec: &mut Decoder<'_>,
    limits: &WireLimits,
    field: EventField,
) -> Result<Option<Payload>, WireError> {
    let value = match dec.datatype()? {
        Type::Null => {
            dec.null()?;
            return Ok(None);
        }
        Type::Undefined => {
            dec.undefined()?;
            return Ok(None);
        }
        Type::Bool => Payload::Bool(dec.bool()?),
        Type::U8 | Type::U16 | Type::U32 | Type::U64 | Type::I8 | Type::I16 | Type::I32
        | Type::I64 => Payload::Int(dec.i64().map_err(|e| WireError::InvalidField {
            field,
            reason: format!("integer out of range: {e}"),
        })?),
        Type::F32 => Payload::Float(f64::from(dec.f32()?)),
        Type::F64 => Payload::Float(dec.f64()?),
        Type::String => Payload::Text(decode_text(dec, limits)?.to_owned()),
        Type::Bytes => Payload::Bytes(Bytes::copy_from_slice(decode_bytes(dec, limits)?)),
        Type::Array => {
            let len = dec.array()?.ok_or(WireError::IndefiniteLength)?;
            if len != 2 {
                return Err(WireError::InvalidField {
                    field,
                    reason: format!("typed object must have 2 elements, got {len}"),
                });
            }
            let tag = TypeTag::new(decode_text(dec, limits)?);
            let body = Bytes::copy_from_slice(decode_bytes(dec, limits)?);
            Payload::Typed { tag, body }
        }
        Type::StringIndef | Type::BytesIndef | Type::ArrayIndef | Type::MapIndef => {
            return Err(WireError::IndefiniteLength);
        }
        other => {
            return Err(WireError::InvalidField {
                field,
                reason: format!("unsupported CBOR item {other:?}"),
            });
        }
    };
    Ok(Some(value))
}

fn decode_text<'a>(dec: &mut Decoder<'a>, limits: &WireLimits) -> Result<&'a str, WireError> {
    if matches!(dec.datatype()?, Type::StringIndef) {
        return Err(WireError::IndefiniteLength);
    }
    let text = dec.str()?;
    if text.len() > limits.max_text_len {
        return Err(WireError::LimitExceeded("max_text_len"));
    }
    Ok(text)
}

fn decode_bytes<'a>(dec: &mut Decoder<'a>, limits: &WireLimits) -> Result<&'a [u8], WireError> {
    if matches!(dec.datatype()?, Type::BytesIndef) {
        return Err(WireError::IndefiniteLength);
    }
    let bytes = dec.bytes()?;
    if bytes.len() > limits.max_bytes_len {
        return Err(WireError::LimitExceeded("max_bytes_len"));
    }
    Ok(bytes)
}
