//! Resolution of opaque wire objects into concrete key and value types.
//!
//! The wire carries keys and values as [`Payload`]s. Which Rust type they
//! become is decided by the surrounding system through a [`TypeResolver`],
//! given the field being read and the asset the record belongs to.

use std::collections::HashMap;
use std::marker::PhantomData;

use assetmap_types::{AssetName, FromPayload, Payload, PayloadError, TypeTag};
use assetmap_wire::EventField;

use crate::error::EventError;

/// Where an opaque object is being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// The field being read.
    pub field: EventField,
    /// The asset named by the record.
    pub asset_name: &'a AssetName,
}

impl<'a> ResolveContext<'a> {
    /// Context for `field` of a record belonging to `asset_name`.
    pub const fn new(field: EventField, asset_name: &'a AssetName) -> Self {
        Self { field, asset_name }
    }

    /// Attribute a conversion failure to this field and asset.
    pub fn error(&self, source: PayloadError) -> EventError {
        EventError::Resolve {
            field: self.field,
            asset_name: self.asset_name.clone(),
            source,
        }
    }
}

/// Resolves opaque keys and values of a record.
pub trait TypeResolver<K, V> {
    /// Resolve the record's key.
    fn resolve_key(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<K, EventError>;

    /// Resolve the record's old or new value.
    fn resolve_value(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<V, EventError>;
}

/// Keeps keys and values as [`Payload`]s: the "any object" read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErasedResolver;

impl TypeResolver<Payload, Payload> for ErasedResolver {
    fn resolve_key(&self, _ctx: &ResolveContext<'_>, payload: Payload) -> Result<Payload, EventError> {
        Ok(payload)
    }

    fn resolve_value(
        &self,
        _ctx: &ResolveContext<'_>,
        payload: Payload,
    ) -> Result<Payload, EventError> {
        Ok(payload)
    }
}

/// Converts keys and values through [`FromPayload`], whatever the asset.
pub struct PayloadResolver<K, V> {
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> PayloadResolver<K, V> {
    /// Create a resolver for keys `K` and values `V`.
    pub const fn new() -> Self {
        Self {
            _types: PhantomData,
        }
    }
}

impl<K, V> Default for PayloadResolver<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> core::fmt::Debug for PayloadResolver<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PayloadResolver").finish()
    }
}

impl<K: FromPayload, V: FromPayload> TypeResolver<K, V> for PayloadResolver<K, V> {
    fn resolve_key(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<K, EventError> {
        K::from_payload(payload).map_err(|e| ctx.error(e))
    }

    fn resolve_value(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<V, EventError> {
        V::from_payload(payload).map_err(|e| ctx.error(e))
    }
}

// ---------------------------------------------------------------------------
// Schema registry
// ---------------------------------------------------------------------------

/// The key and value types an asset holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSchema {
    /// Type tag of the asset's keys.
    pub key: TypeTag,
    /// Type tag of the asset's values.
    pub value: TypeTag,
}

impl AssetSchema {
    /// Schema with the given key and value tags.
    pub const fn new(key: TypeTag, value: TypeTag) -> Self {
        Self { key, value }
    }
}

/// Resolves opaque objects against per-asset schemas.
///
/// A payload must carry the tag its asset's schema declares before it is
/// converted. Text and byte payloads are interchangeable, since they are
/// two buffer representations of the same content.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<AssetName, AssetSchema>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the schema of `asset_name`.
    pub fn register(&mut self, asset_name: impl Into<AssetName>, schema: AssetSchema) {
        self.schemas.insert(asset_name.into(), schema);
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, asset_name: impl Into<AssetName>, schema: AssetSchema) -> Self {
        self.register(asset_name, schema);
        self
    }

    /// The schema registered for `asset_name`.
    pub fn get(&self, asset_name: &AssetName) -> Option<&AssetSchema> {
        self.schemas.get(asset_name)
    }

    fn schema(&self, ctx: &ResolveContext<'_>) -> Result<&AssetSchema, EventError> {
        self.get(ctx.asset_name)
            .ok_or_else(|| EventError::UnknownAsset(ctx.asset_name.clone()))
    }
}

fn check_tag<T: FromPayload>(
    ctx: &ResolveContext<'_>,
    expected: &TypeTag,
    payload: Payload,
) -> Result<T, EventError> {
    match &payload {
        Payload::Typed { tag, .. } if tag.is_primitive() => {
            return Err(ctx.error(PayloadError::ReservedTag(tag.clone())));
        }
        _ => {}
    }
    let actual = payload.tag();
    let interchangeable = (*expected == TypeTag::TEXT || *expected == TypeTag::BYTES)
        && payload.content_bytes().is_some();
    if actual != *expected && !interchangeable {
        return Err(ctx.error(PayloadError::TypeMismatch {
            expected: expected.clone(),
            actual,
        }));
    }
    T::from_payload(payload).map_err(|e| ctx.error(e))
}

impl<K: FromPayload, V: FromPayload> TypeResolver<K, V> for SchemaRegistry {
    fn resolve_key(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<K, EventError> {
        let schema = self.schema(ctx)?;
        check_tag(ctx, &schema.key, payload)
    }

    fn resolve_value(&self, ctx: &ResolveContext<'_>, payload: Payload) -> Result<V, EventError> {
        let schema = self.schema(ctx)?;
        check_tag(ctx, &schema.value, payload)
    }
}
