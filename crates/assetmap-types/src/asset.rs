//! Identifier of the logical mapping an event belongs to.

use std::sync::Arc;

/// Name of an asset (a keyed collection) that produced an event.
///
/// Backed by an `Arc<str>` so that translating an event into another
/// key/value representation shares the name instead of copying it. The
/// empty name is legal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetName(Arc<str>);

impl AssetName {
    /// Create an asset name from any string-like value.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the degenerate empty name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for AssetName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AssetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetName {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for AssetName {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl PartialEq<str> for AssetName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for AssetName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let name = AssetName::from("trades");
        let copy = name.clone();
        assert!(Arc::ptr_eq(&name.0, &copy.0));
        assert_eq!(copy, "trades");
    }

    #[test]
    fn empty_name_is_legal() {
        let name = AssetName::from(String::new());
        assert!(name.is_empty());
        assert_eq!(name.to_string(), "");
    }
}
