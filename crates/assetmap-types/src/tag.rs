//! Schema tags for opaque payloads.
//!
//! A [`TypeTag`] names the concrete type a payload carries. Primitive
//! payloads have fixed tags; [`crate::Payload::Typed`] carries an
//! application-defined tag next to its raw body.

use std::borrow::Cow;

/// Name of the concrete type carried by a [`crate::Payload`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    /// Tag of [`crate::Payload::Bool`].
    pub const BOOL: Self = Self(Cow::Borrowed("bool"));
    /// Tag of [`crate::Payload::Int`].
    pub const INT: Self = Self(Cow::Borrowed("int"));
    /// Tag of [`crate::Payload::Float`].
    pub const FLOAT: Self = Self(Cow::Borrowed("float"));
    /// Tag of [`crate::Payload::Text`].
    pub const TEXT: Self = Self(Cow::Borrowed("text"));
    /// Tag of [`crate::Payload::Bytes`].
    pub const BYTES: Self = Self(Cow::Borrowed("bytes"));

    /// Create a tag for an application-defined type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Create a tag from a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Borrow the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is one of the built-in primitive tags.
    pub fn is_primitive(&self) -> bool {
        matches!(self.as_str(), "bool" | "int" | "float" | "text" | "bytes")
    }
}

impl core::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_and_static_tags_compare_by_content() {
        assert_eq!(TypeTag::new("text"), TypeTag::TEXT);
        assert!(TypeTag::new("int").is_primitive());
        assert!(!TypeTag::from_static("price-level").is_primitive());
    }
}
