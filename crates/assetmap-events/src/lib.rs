//! Typed change events for assetmap key/value assets.
//!
//! A change event is a self-describing delta of one key in one asset: the
//! key, the value before and after the change, and the replication and
//! change flags. Events are immutable snapshots. They can be translated
//! into another key/value representation, dispatched to a listener, and
//! written to or read from the field-keyed wire format of `assetmap-wire`.
//!
//! # Modules
//!
//! - [`map_event`] -- The [`MapEvent`] and [`Translate`] capabilities
//! - [`updated`] -- [`UpdatedEvent`], the "key changed" record, and its builder
//! - [`listener`] -- [`MapEventListener`], the observer side of `apply`
//! - [`resolve`] -- [`TypeResolver`] implementations for decoding opaque fields
//! - [`envelope`] -- Kind-tagged encoding and the dispatching decoder
//! - [`error`] -- [`EventError`]
//!
//! # Usage
//!
//! ```
//! use assetmap_events::{decode_event, encode_event, MapEvent, PayloadResolver, UpdatedEvent};
//! use assetmap_wire::WireLimits;
//!
//! let event = UpdatedEvent::changed("trades", 42_i64, Some(100_i64), Some(200_i64), false);
//! assert!(event.has_value_changed());
//!
//! let bytes = encode_event(&event, &WireLimits::default()).ok();
//! let decoded = bytes.and_then(|bytes| {
//!     decode_event(&bytes, &PayloadResolver::<i64, i64>::new(), &WireLimits::default()).ok()
//! });
//! assert_eq!(decoded.as_ref(), Some(&event));
//! assert_eq!(decoded.map(|e| *e.key()), Some(42));
//! ```

pub mod envelope;
pub mod error;
pub mod listener;
pub mod map_event;
pub mod resolve;
pub mod updated;

// Re-export primary types at crate root.
pub use envelope::{decode_event, decode_record, encode_event, encode_record};
pub use error::EventError;
pub use listener::{FnListener, MapEventListener, listener_fn};
pub use map_event::{MapEvent, Translate, kind};
pub use resolve::{
    AssetSchema, ErasedResolver, PayloadResolver, ResolveContext, SchemaRegistry, TypeResolver,
};
pub use updated::{UpdatedEvent, UpdatedEventBuilder};
