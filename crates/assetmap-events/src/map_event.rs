//! Capabilities shared by every kind of change event.

use assetmap_types::AssetName;

use crate::listener::MapEventListener;

/// Kind tags of the event family.
///
/// The tag is written as the outer `type` field of an encoded event and
/// mixed into each kind's hash so that events of different kinds never
/// collide on the same key and value.
pub mod kind {
    /// Tag of [`crate::UpdatedEvent`].
    pub const UPDATED: &str = "updated";
}

/// Read access and listener dispatch for a change event.
pub trait MapEvent<K, V> {
    /// The kind tag of this event type.
    const KIND: &'static str;

    /// The asset the event belongs to.
    fn asset_name(&self) -> &AssetName;

    /// The affected key.
    fn key(&self) -> &K;

    /// The value before the change, if the key was set.
    fn old_value(&self) -> Option<&V>;

    /// The value after the change, if the key is still set.
    fn value(&self) -> Option<&V>;

    /// Whether the event came from inbound replication rather than a local
    /// mutation. Consumers use this to avoid re-propagating it.
    fn is_replication_event(&self) -> bool;

    /// Hand the event to `listener`.
    ///
    /// Stateless: calling it again calls the listener again. The listener's
    /// error is returned as-is.
    fn apply<L>(&self, listener: &mut L) -> Result<(), L::Error>
    where
        L: MapEventListener<K, V> + ?Sized;
}

/// Conversion of an event into another key/value representation.
///
/// Both operations build a new event and leave `self` untouched. The
/// functions run eagerly, once per present field; an absent value stays
/// absent and is never passed to `value_fn`.
pub trait Translate<K, V> {
    /// The same event kind with keys `K2` and values `V2`.
    type Output<K2, V2>;

    /// Translate with unary functions.
    fn translate_with<K2, V2, KF, VF>(&self, key_fn: KF, value_fn: VF) -> Self::Output<K2, V2>
    where
        KF: FnOnce(&K) -> K2,
        VF: FnMut(&V) -> V2;

    /// Translate with seeded functions.
    ///
    /// Each function receives the original field and a seed of the target
    /// type (typically an empty, pre-allocated buffer) to fill and return.
    /// The value seed is cloned for the old value and moved into the call
    /// for the new value.
    fn translate_into<K2, V2, KF, VF>(
        &self,
        key_seed: K2,
        key_fn: KF,
        value_seed: V2,
        value_fn: VF,
    ) -> Self::Output<K2, V2>
    where
        KF: FnOnce(&K, K2) -> K2,
        VF: FnMut(&V, V2) -> V2,
        V2: Clone;
}
