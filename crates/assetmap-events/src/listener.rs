//! Observers of change events.

use core::marker::PhantomData;

use assetmap_types::AssetName;

/// The observer side of [`crate::MapEvent::apply`].
///
/// A listener's error is returned unchanged from `apply`; the event never
/// wraps or swallows it.
pub trait MapEventListener<K, V> {
    /// The listener's own failure type.
    type Error;

    /// Called once per `apply` with the changed key and its old and new
    /// values.
    fn update(
        &mut self,
        asset_name: &AssetName,
        key: &K,
        old_value: Option<&V>,
        value: Option<&V>,
    ) -> Result<(), Self::Error>;
}

/// A [`MapEventListener`] backed by a closure. Built by [`listener_fn`].
pub struct FnListener<F, E> {
    f: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> core::fmt::Debug for FnListener<F, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnListener").finish_non_exhaustive()
    }
}

/// Wrap a closure as a listener.
///
/// ```
/// use assetmap_events::{listener_fn, MapEvent, UpdatedEvent};
///
/// let event = UpdatedEvent::of("trades", 42_i64, Some(100_i64), Some(200_i64), false, true);
/// let mut seen = Vec::new();
/// let mut listener = listener_fn(|asset, key: &i64, old: Option<&i64>, new: Option<&i64>| {
///     seen.push((asset.to_string(), *key, old.copied(), new.copied()));
///     Ok::<(), String>(())
/// });
/// assert!(event.apply(&mut listener).is_ok());
/// drop(listener);
/// assert_eq!(seen, vec![("trades".to_owned(), 42, Some(100), Some(200))]);
/// ```
pub const fn listener_fn<K, V, E, F>(f: F) -> FnListener<F, E>
where
    F: FnMut(&AssetName, &K, Option<&V>, Option<&V>) -> Result<(), E>,
{
    FnListener {
        f,
        _error: PhantomData,
    }
}

impl<K, V, E, F> MapEventListener<K, V> for FnListener<F, E>
where
    F: FnMut(&AssetName, &K, Option<&V>, Option<&V>) -> Result<(), E>,
{
    type Error = E;

    fn update(
        &mut self,
        asset_name: &AssetName,
        key: &K,
        old_value: Option<&V>,
        value: Option<&V>,
    ) -> Result<(), E> {
        (self.f)(asset_name, key, old_value, value)
    }
}
