//! Output rendering for decoded events.

use assetmap_events::{MapEvent, UpdatedEvent};
use assetmap_types::Payload;
use clap::ValueEnum;

/// How each decoded event is written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The event's display form.
    #[default]
    Text,
    /// One JSON object per line, keyed by wire field name.
    Json,
}

/// Render `event` as a single output line (without the trailing newline).
pub fn render(event: &UpdatedEvent<Payload, Payload>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => event.to_string(),
        OutputFormat::Json => event_json(event).to_string(),
    }
}

/// JSON object for `event`, keyed by wire field name.
pub fn event_json(event: &UpdatedEvent<Payload, Payload>) -> serde_json::Value {
    serde_json::json!({
        "type": <UpdatedEvent<Payload, Payload> as MapEvent<Payload, Payload>>::KIND,
        "assetName": event.asset_name().as_str(),
        "key": payload_json(event.key()),
        "oldValue": event.old_value().map(payload_json),
        "value": event.value().map(payload_json),
        "isReplicationEvent": event.is_replication_event(),
        "hasValueChanged": event.has_value_changed(),
    })
}

fn payload_json(payload: &Payload) -> serde_json::Value {
    match payload {
        Payload::Bool(b) => serde_json::Value::Bool(*b),
        Payload::Int(i) => serde_json::Value::from(*i),
        // Non-finite floats have no JSON form
        Payload::Float(x) => serde_json::Number::from_f64(*x)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Payload::Text(text) => serde_json::Value::String(text.clone()),
        Payload::Bytes(bytes) => match core::str::from_utf8(bytes) {
            Ok(text) => serde_json::Value::String(text.to_owned()),
            Err(_) => serde_json::Value::String(hex_string(bytes)),
        },
        Payload::Typed { tag, body } => serde_json::json!({
            "tag": tag.as_str(),
            "body": hex_string(body),
        }),
    }
}

fn hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
