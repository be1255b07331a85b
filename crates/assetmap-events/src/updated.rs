//! The "key changed" event.
//!
//! [`UpdatedEvent`] records that a key's value changed from `old_value` to
//! `value` within an asset. It is immutable after construction: translation
//! builds a new event and leaves the original alone, so an event can be
//! shared between threads without locking.
//!
//! Equality covers the asset name, key, both values, and the replication
//! flag. The change flag is a producer hint and is left out. The hash
//! covers only the kind tag, key, and new value, so events whose old value
//! was reconstructed differently after a replication round-trip still land
//! in the same bucket.

use core::hash::{Hash, Hasher};

use assetmap_types::{AssetName, ToPayload};
use assetmap_wire::{EventField, WireError, WireIn, WireOut};

use crate::error::EventError;
use crate::listener::MapEventListener;
use crate::map_event::{MapEvent, Translate, kind};
use crate::resolve::{ResolveContext, TypeResolver};

/// A key's value changed within an asset.
#[derive(Debug, Clone)]
pub struct UpdatedEvent<K, V> {
    asset_name: AssetName,
    key: K,
    old_value: Option<V>,
    value: Option<V>,
    is_replication_event: bool,
    has_value_changed: bool,
}

impl<K, V> UpdatedEvent<K, V> {
    /// Capture all six fields of an event.
    pub fn of(
        asset_name: impl Into<AssetName>,
        key: K,
        old_value: Option<V>,
        value: Option<V>,
        is_replication_event: bool,
        has_value_changed: bool,
    ) -> Self {
        Self {
            asset_name: asset_name.into(),
            key,
            old_value,
            value,
            is_replication_event,
            has_value_changed,
        }
    }

    /// Capture an event, computing the change flag from the two values.
    pub fn changed(
        asset_name: impl Into<AssetName>,
        key: K,
        old_value: Option<V>,
        value: Option<V>,
        is_replication_event: bool,
    ) -> Self
    where
        V: PartialEq,
    {
        let has_value_changed = old_value != value;
        Self::of(
            asset_name,
            key,
            old_value,
            value,
            is_replication_event,
            has_value_changed,
        )
    }

    /// Start building an event for `key` in `asset_name`.
    pub fn builder(asset_name: impl Into<AssetName>, key: K) -> UpdatedEventBuilder<K, V> {
        UpdatedEventBuilder {
            asset_name: asset_name.into(),
            key,
            old_value: None,
            value: None,
            is_replication_event: false,
            has_value_changed: None,
        }
    }

    /// Producer-computed hint that the old and new values differ.
    pub const fn has_value_changed(&self) -> bool {
        self.has_value_changed
    }

    /// Write the six record fields in their fixed order.
    pub fn write_marshallable<W>(&self, wire: &mut W) -> Result<(), WireError>
    where
        W: WireOut + ?Sized,
        K: ToPayload,
        V: ToPayload,
    {
        let old_value = self.old_value.as_ref().map(ToPayload::to_payload);
        let value = self.value.as_ref().map(ToPayload::to_payload);

        wire.write_text(EventField::AssetName, self.asset_name.as_str())?;
        wire.write_object(EventField::Key, Some(&self.key.to_payload()))?;
        wire.write_object(EventField::OldValue, old_value.as_ref())?;
        wire.write_object(EventField::Value, value.as_ref())?;
        wire.write_bool(EventField::IsReplicationEvent, self.is_replication_event)?;
        wire.write_bool(EventField::HasValueChanged, self.has_value_changed)
    }

    /// Read the six record fields by name, resolving key and values
    /// through `resolver`.
    ///
    /// `assetName` and `key` are required. Missing values read as absent
    /// and missing flags read as `false`.
    pub fn read_marshallable<W, R>(wire: &mut W, resolver: &R) -> Result<Self, EventError>
    where
        W: WireIn + ?Sized,
        R: TypeResolver<K, V> + ?Sized,
    {
        let asset_name = AssetName::from(wire.read_text(EventField::AssetName)?);

        let key_payload = wire.require_object(EventField::Key)?;
        let key = resolver.resolve_key(
            &ResolveContext::new(EventField::Key, &asset_name),
            key_payload,
        )?;

        let old_value = wire
            .read_object(EventField::OldValue)?
            .map(|payload| {
                resolver.resolve_value(
                    &ResolveContext::new(EventField::OldValue, &asset_name),
                    payload,
                )
            })
            .transpose()?;
        let value = wire
            .read_object(EventField::Value)?
            .map(|payload| {
                resolver.resolve_value(&ResolveContext::new(EventField::Value, &asset_name), payload)
            })
            .transpose()?;

        let is_replication_event = wire
            .read_bool(EventField::IsReplicationEvent)?
            .unwrap_or(false);
        let has_value_changed = wire.read_bool(EventField::HasValueChanged)?.unwrap_or(false);

        Ok(Self {
            asset_name,
            key,
            old_value,
            value,
            is_replication_event,
            has_value_changed,
        })
    }
}

impl<K, V> MapEvent<K, V> for UpdatedEvent<K, V> {
    const KIND: &'static str = kind::UPDATED;

    fn asset_name(&self) -> &AssetName {
        &self.asset_name
    }

    fn key(&self) -> &K {
        &self.key
    }

    fn old_value(&self) -> Option<&V> {
        self.old_value.as_ref()
    }

    fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    fn is_replication_event(&self) -> bool {
        self.is_replication_event
    }

    fn apply<L>(&self, listener: &mut L) -> Result<(), L::Error>
    where
        L: MapEventListener<K, V> + ?Sized,
    {
        listener.update(
            &self.asset_name,
            &self.key,
            self.old_value.as_ref(),
            self.value.as_ref(),
        )
    }
}

impl<K, V> Translate<K, V> for UpdatedEvent<K, V> {
    type Output<K2, V2> = UpdatedEvent<K2, V2>;

    fn translate_with<K2, V2, KF, VF>(&self, key_fn: KF, mut value_fn: VF) -> UpdatedEvent<K2, V2>
    where
        KF: FnOnce(&K) -> K2,
        VF: FnMut(&V) -> V2,
    {
        UpdatedEvent {
            asset_name: self.asset_name.clone(),
            key: key_fn(&self.key),
            old_value: self.old_value.as_ref().map(&mut value_fn),
            value: self.value.as_ref().map(&mut value_fn),
            is_replication_event: self.is_replication_event,
            has_value_changed: self.has_value_changed,
        }
    }

    fn translate_into<K2, V2, KF, VF>(
        &self,
        key_seed: K2,
        key_fn: KF,
        value_seed: V2,
        mut value_fn: VF,
    ) -> UpdatedEvent<K2, V2>
    where
        KF: FnOnce(&K, K2) -> K2,
        VF: FnMut(&V, V2) -> V2,
        V2: Clone,
    {
        let old_value = self
            .old_value
            .as_ref()
            .map(|v| value_fn(v, value_seed.clone()));
        let value = self.value.as_ref().map(|v| value_fn(v, value_seed));
        UpdatedEvent {
            asset_name: self.asset_name.clone(),
            key: key_fn(&self.key, key_seed),
            old_value,
            value,
            is_replication_event: self.is_replication_event,
            has_value_changed: self.has_value_changed,
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for UpdatedEvent<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.asset_name == other.asset_name
            && self.key == other.key
            && self.old_value == other.old_value
            && self.value == other.value
            && self.is_replication_event == other.is_replication_event
    }
}

impl<K: Eq, V: Eq> Eq for UpdatedEvent<K, V> {}

impl<K: Hash, V: Hash> Hash for UpdatedEvent<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        kind::UPDATED.hash(state);
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl<K: core::fmt::Display, V: core::fmt::Display> core::fmt::Display for UpdatedEvent<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "UpdatedEvent{{assetName='{}', key={}, oldValue=",
            self.asset_name, self.key
        )?;
        write_optional(f, self.old_value.as_ref())?;
        f.write_str(", value=")?;
        write_optional(f, self.value.as_ref())?;
        write!(f, ", isReplicationEvent={}}}", self.is_replication_event)
    }
}

fn write_optional<V: core::fmt::Display>(
    f: &mut core::fmt::Formatter<'_>,
    value: Option<&V>,
) -> core::fmt::Result {
    match value {
        Some(value) => write!(f, "{value}"),
        None => f.write_str("null"),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`UpdatedEvent`].
///
/// Values default to absent and the replication flag to `false`. Unless
/// [`value_changed`](Self::value_changed) is set explicitly, `build`
/// computes the change flag by comparing the two values.
///
/// ```
/// use assetmap_events::{MapEvent, UpdatedEvent};
///
/// let event = UpdatedEvent::<&str, i64>::builder("positions", "ACME")
///     .value(10)
///     .replication(true)
///     .build();
///
/// assert_eq!(event.old_value(), None);
/// assert!(event.has_value_changed());
/// assert!(event.is_replication_event());
/// ```
#[derive(Debug)]
pub struct UpdatedEventBuilder<K, V> {
    asset_name: AssetName,
    key: K,
    old_value: Option<V>,
    value: Option<V>,
    is_replication_event: bool,
    has_value_changed: Option<bool>,
}

impl<K, V> UpdatedEventBuilder<K, V> {
    /// Set the value before the change.
    #[must_use]
    pub fn old_value(mut self, old_value: V) -> Self {
        self.old_value = Some(old_value);
        self
    }

    /// Set the value after the change.
    #[must_use]
    pub fn value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Mark the event as coming from inbound replication.
    #[must_use]
    pub fn replication(mut self, is_replication_event: bool) -> Self {
        self.is_replication_event = is_replication_event;
        self
    }

    /// Override the computed change flag.
    #[must_use]
    pub fn value_changed(mut self, has_value_changed: bool) -> Self {
        self.has_value_changed = Some(has_value_changed);
        self
    }

    /// Produce the event.
    pub fn build(self) -> UpdatedEvent<K, V>
    where
        V: PartialEq,
    {
        let has_value_changed = self
            .has_value_changed
            .unwrap_or_else(|| self.old_value != self.value);
        UpdatedEvent {
            asset_name: self.asset_name,
            key: self.key,
            old_value: self.old_value,
            value: self.value,
            is_replication_event: self.is_replication_event,
            has_value_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects
    )]

    use std::collections::hash_map::DefaultHasher;

    use assetmap_types::Payload;
    use bytes::Bytes;

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn trade() -> UpdatedEvent<i64, i64> {
        UpdatedEvent::of("trades", 42, Some(100), Some(200), false, true)
    }

    #[test]
    fn accessors_return_constructed_fields() {
        let event = trade();
        assert_eq!(event.asset_name(), &AssetName::from("trades"));
        assert_eq!(*event.key(), 42);
        assert_eq!(event.old_value(), Some(&100));
        assert_eq!(event.value(), Some(&200));
        assert!(!event.is_replication_event());
        assert!(event.has_value_changed());
    }

    #[test]
    fn absent_is_distinct_from_present_zero() {
        let absent = UpdatedEvent::<i64, i64>::of("trades", 1, None, Some(0), false, true);
        let zero = UpdatedEvent::<i64, i64>::of("trades", 1, Some(0), Some(0), false, true);
        assert_eq!(absent.old_value(), None);
        assert_eq!(zero.old_value(), Some(&0));
        assert_ne!(absent, zero);
    }

    #[test]
    fn changed_computes_the_flag() {
        let same = UpdatedEvent::changed("trades", 1_i64, Some(5_i64), Some(5), false);
        let differ = UpdatedEvent::changed("trades", 1_i64, None, Some(5_i64), false);
        assert!(!same.has_value_changed());
        assert!(differ.has_value_changed());
    }

    #[test]
    fn builder_flag_can_be_overridden() {
        let event = UpdatedEvent::<i64, i64>::builder("trades", 1)
            .old_value(5)
            .value(5)
            .value_changed(true)
            .build();
        assert!(event.has_value_changed());
    }

    #[test]
    fn equality_ignores_change_flag_but_not_replication() {
        let a = trade();
        let b = UpdatedEvent::of("trades", 42, Some(100), Some(200), false, false);
        let c = UpdatedEvent::of("trades", 42, Some(100), Some(200), true, true);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn hash_ignores_old_value_and_replication() {
        let a = trade();
        let b = UpdatedEvent::of("trades", 42, None, Some(200), true, true);
        assert_ne!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn equality_is_semantic_for_byte_buffers() {
        let text = UpdatedEvent::<Payload, Payload>::of(
            "symbols",
            Payload::Text("EURUSD".to_owned()),
            None,
            Some(Payload::Text("1.08".to_owned())),
            false,
            true,
        );
        let bytes = UpdatedEvent::<Payload, Payload>::of(
            "symbols",
            Payload::Bytes(Bytes::from_static(b"EURUSD")),
            None,
            Some(Payload::Bytes(Bytes::from_static(b"1.08"))),
            false,
            true,
        );
        assert_eq!(text, bytes);
        assert_eq!(hash_of(&text), hash_of(&bytes));
    }

    #[test]
    fn display_renders_every_field_but_the_change_flag() {
        assert_eq!(
            trade().to_string(),
            "UpdatedEvent{assetName='trades', key=42, oldValue=100, value=200, isReplicationEvent=false}"
        );
        let first_write = UpdatedEvent::<i64, i64>::of("", 7, None, None, true, false);
        assert_eq!(
            first_write.to_string(),
            "UpdatedEvent{assetName='', key=7, oldValue=null, value=null, isReplicationEvent=true}"
        );
    }

    #[test]
    fn translate_with_builds_a_new_event() {
        let event = trade();
        let translated = event.translate_with(|k| k.to_string(), |v| v * 2);
        assert_eq!(translated.key(), "42");
        assert_eq!(translated.old_value(), Some(&200));
        assert_eq!(translated.value(), Some(&400));
        assert!(translated.has_value_changed());
        assert_eq!(event, trade());
    }

    #[test]
    fn translate_with_never_sees_absent_values() {
        let event = UpdatedEvent::<i64, i64>::of("trades", 1, None, Some(3), false, true);
        let mut calls = 0;
        let translated = event.translate_with(
            |k| *k,
            |v| {
                calls += 1;
                v + 1
            },
        );
        assert_eq!(calls, 1);
        assert_eq!(translated.old_value(), None);
        assert_eq!(translated.value(), Some(&4));
    }

    #[test]
    fn translate_into_fills_seeds() {
        let event = UpdatedEvent::<&str, &str>::of("symbols", "EUR", Some("1.07"), Some("1.08"), false, true);
        let translated = event.translate_into(
            Vec::with_capacity(8),
            |k, mut buf: Vec<u8>| {
                buf.extend_from_slice(k.as_bytes());
                buf
            },
            Vec::with_capacity(8),
            |v, mut buf: Vec<u8>| {
                buf.extend_from_slice(v.as_bytes());
                buf
            },
        );
        assert_eq!(translated.key(), b"EUR");
        assert_eq!(translated.old_value().map(Vec::as_slice), Some(&b"1.07"[..]));
        assert_eq!(translated.value().map(Vec::as_slice), Some(&b"1.08"[..]));
    }

    #[test]
    fn apply_propagates_listener_errors() {
        struct Failing;
        impl MapEventListener<i64, i64> for Failing {
            type Error = &'static str;
            fn update(
                &mut self,
                _asset_name: &AssetName,
                _key: &i64,
                _old_value: Option<&i64>,
                _value: Option<&i64>,
            ) -> Result<(), Self::Error> {
                Err("listener rejected update")
            }
        }
        assert_eq!(trade().apply(&mut Failing), Err("listener rejected update"));
    }
}
