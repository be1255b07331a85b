//! Decode limits.
//!
//! Limits bound the work a reader does on untrusted input. They are part
//! of the inspector's YAML configuration (`wire:` section); every field
//! has a default so an empty section is valid.

use serde::Deserialize;

/// Bounds applied while decoding records and frames.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireLimits {
    /// Largest accepted record, in bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    /// Longest accepted text value or field name, in bytes.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// Longest accepted byte-string value, in bytes.
    #[serde(default = "default_max_bytes_len")]
    pub max_bytes_len: usize,

    /// Most fields accepted in one record.
    #[serde(default = "default_max_map_entries")]
    pub max_map_entries: usize,

    /// Reject records carrying field names no event kind defines. When
    /// false such fields are skipped.
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

impl Default for WireLimits {
    fn default() -> Self {
        Self {
            max_frame_bytes: default_max_frame_bytes(),
            max_text_len: default_max_text_len(),
            max_bytes_len: default_max_bytes_len(),
            max_map_entries: default_max_map_entries(),
            reject_unknown_fields: false,
        }
    }
}

const fn default_max_frame_bytes() -> usize {
    1024 * 1024
}

const fn default_max_text_len() -> usize {
    64 * 1024
}

const fn default_max_bytes_len() -> usize {
    512 * 1024
}

const fn default_max_map_entries() -> usize {
    16
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let limits: WireLimits = serde_yml::from_str("max_map_entries: 8\n").unwrap();
        assert_eq!(limits.max_map_entries, 8);
        assert_eq!(limits.max_frame_bytes, 1024 * 1024);
        assert!(!limits.reject_unknown_fields);
    }
}
