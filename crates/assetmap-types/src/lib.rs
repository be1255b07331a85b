//! Shared value types for assetmap change events.
//!
//! Everything that crosses the wire boundary without a statically known
//! Rust type lives here. Keys and values of a mapping travel as
//! [`Payload`]s (opaque typed objects) and are turned back into concrete
//! types by a resolver in `assetmap-events`.
//!
//! # Modules
//!
//! - [`asset`] -- [`AssetName`], the identifier of a logical mapping
//! - [`tag`] -- [`TypeTag`], the schema tag carried by every payload
//! - [`payload`] -- [`Payload`] and the [`ToPayload`] / [`FromPayload`] conversions

pub mod asset;
pub mod payload;
pub mod tag;

// Re-export all public types at crate root for convenience.
pub use asset::AssetName;
pub use payload::{FromPayload, Payload, PayloadError, ToPayload};
pub use tag::TypeTag;
