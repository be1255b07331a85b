//! Kind-tagged encoding and the dispatching decoder.
//!
//! An encoded event is one wire record holding the outer `type` tag next
//! to the kind's own fields. [`decode_event`] reads the tag first and hands
//! the record to the matching kind's reader. [`encode_record`] and
//! [`decode_record`] handle the bare record, for channels that carry the
//! kind out of band.

use assetmap_types::ToPayload;
use assetmap_wire::{CborWireIn, CborWireOut, EventField, WireError, WireIn, WireLimits, WireOut};
use bytes::Bytes;

use crate::error::EventError;
use crate::map_event::{MapEvent, kind};
use crate::resolve::TypeResolver;
use crate::updated::UpdatedEvent;

/// Encode `event` with its kind tag.
///
/// Fails with [`WireError::LimitExceeded`] when a reader using the same
/// `limits` would reject the record, so every encoded event decodes back.
pub fn encode_event<K, V>(
    event: &UpdatedEvent<K, V>,
    limits: &WireLimits,
) -> Result<Bytes, WireError>
where
    K: ToPayload,
    V: ToPayload,
{
    let mut wire = CborWireOut::with_limits(limits);
    wire.write_text(EventField::Type, <UpdatedEvent<K, V> as MapEvent<K, V>>::KIND)?;
    event.write_marshallable(&mut wire)?;
    wire.finish()
}

/// Decode a kind-tagged event.
///
/// Fails with [`EventError::UnsupportedKind`] when the tag names a kind
/// other than `updated`, and with [`WireError::MissingField`] when there
/// is no tag at all.
pub fn decode_event<K, V, R>(
    bytes: &[u8],
    resolver: &R,
    limits: &WireLimits,
) -> Result<UpdatedEvent<K, V>, EventError>
where
    R: TypeResolver<K, V> + ?Sized,
{
    let mut wire = CborWireIn::parse(bytes, limits)?;
    let event_kind = wire.read_text(EventField::Type)?;
    match event_kind.as_str() {
        kind::UPDATED => UpdatedEvent::read_marshallable(&mut wire, resolver),
        _ => {
            tracing::debug!(kind = %event_kind, "no reader for event kind");
            Err(EventError::UnsupportedKind(event_kind))
        }
    }
}

/// Encode the bare record of `event`, without a kind tag, bounded by
/// `limits`.
pub fn encode_record<K, V>(
    event: &UpdatedEvent<K, V>,
    limits: &WireLimits,
) -> Result<Bytes, WireError>
where
    K: ToPayload,
    V: ToPayload,
{
    let mut wire = CborWireOut::with_limits(limits);
    event.write_marshallable(&mut wire)?;
    wire.finish()
}

/// Decode a bare record written by [`encode_record`].
pub fn decode_record<K, V, R>(
    bytes: &[u8],
    resolver: &R,
    limits: &WireLimits,
) -> Result<UpdatedEvent<K, V>, EventError>
where
    R: TypeResolver<K, V> + ?Sized,
{
    let mut wire = CborWireIn::parse(bytes, limits)?;
    UpdatedEvent::read_marshallable(&mut wire, resolver)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use assetmap_types::Payload;

    use super::*;
    use crate::resolve::{ErasedResolver, PayloadResolver};

    #[test]
    fn tagged_event_round_trips() {
        let event = UpdatedEvent::<i64, String>::of(
            "orders",
            7,
            Some("open".to_owned()),
            Some("filled".to_owned()),
            true,
            true,
        );
        let bytes = encode_event(&event, &WireLimits::default()).unwrap();
        let decoded: UpdatedEvent<i64, String> =
            decode_event(&bytes, &PayloadResolver::new(), &WireLimits::default()).unwrap();
        assert_eq!(decoded, event);
        assert!(decoded.has_value_changed());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut wire = CborWireOut::new();
        wire.write_text(EventField::Type, "removed").unwrap();
        UpdatedEvent::<i64, i64>::of("orders", 1, Some(1), None, false, true)
            .write_marshallable(&mut wire)
            .unwrap();
        let bytes = wire.finish().unwrap();

        let result: Result<UpdatedEvent<Payload, Payload>, _> =
            decode_event(&bytes, &ErasedResolver, &WireLimits::default());
        assert_eq!(result, Err(EventError::UnsupportedKind("removed".to_owned())));
    }

    #[test]
    fn bare_record_has_no_kind() {
        let event = UpdatedEvent::<i64, i64>::of("orders", 1, None, Some(2), false, true);
        let bytes = encode_record(&event, &WireLimits::default()).unwrap();

        let missing_kind: Result<UpdatedEvent<i64, i64>, _> =
            decode_event(&bytes, &PayloadResolver::new(), &WireLimits::default());
        assert_eq!(
            missing_kind,
            Err(EventError::Wire(WireError::MissingField(EventField::Type)))
        );

        let decoded: UpdatedEvent<i64, i64> =
            decode_record(&bytes, &PayloadResolver::new(), &WireLimits::default()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn erased_decode_keeps_payloads() {
        let event = UpdatedEvent::<i64, f64>::of("prices", 3, Some(1.5), Some(2.5), false, true);
        let bytes = encode_event(&event, &WireLimits::default()).unwrap();
        let decoded: UpdatedEvent<Payload, Payload> =
            decode_event(&bytes, &ErasedResolver, &WireLimits::default()).unwrap();
        assert_eq!(decoded.key(), &Payload::Int(3));
        assert_eq!(decoded.value(), Some(&Payload::Float(2.5)));
    }
}
