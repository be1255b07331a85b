//! Field names shared by every event kind.

/// A named field of an event record.
///
/// The same names are used by every kind in the event family so that a
/// generic decoder can dispatch on [`EventField::Type`] before handing the
/// record to the kind-specific reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventField {
    /// Outer event-kind tag.
    Type,
    /// Name of the asset the event belongs to.
    AssetName,
    /// The affected key.
    Key,
    /// Value before the change.
    OldValue,
    /// Value after the change.
    Value,
    /// Whether the event came from inbound replication.
    IsReplicationEvent,
    /// Producer-computed change hint.
    HasValueChanged,
}

impl EventField {
    /// The record fields in write order.
    pub const RECORD: [Self; 6] = [
        Self::AssetName,
        Self::Key,
        Self::OldValue,
        Self::Value,
        Self::IsReplicationEvent,
        Self::HasValueChanged,
    ];

    /// The name written on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::AssetName => "assetName",
            Self::Key => "key",
            Self::OldValue => "oldValue",
            Self::Value => "value",
            Self::IsReplicationEvent => "isReplicationEvent",
            Self::HasValueChanged => "hasValueChanged",
        }
    }

    /// Look up a field by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "type" => Some(Self::Type),
            "assetName" => Some(Self::AssetName),
            "key" => Some(Self::Key),
            "oldValue" => Some(Self::OldValue),
            "value" => Some(Self::Value),
            "isReplicationEvent" => Some(Self::IsReplicationEvent),
            "hasValueChanged" => Some(Self::HasValueChanged),
            _ => None,
        }
    }
}

impl core::fmt::Display for EventField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
