use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Metadata common to every logged event.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventMeta {
    pub event_type: String,
    /// Seconds since the Unix epoch. Replay order is defined by this field,
    /// not by append order: historical data may arrive out of insertion order.
    pub timestamp: f64,
    pub uuid: String,
}

/// The wire shape of one entry in the append-only event log.
///
/// The payload stays untyped here; the upcast stage decodes it into the
/// canonical [`Payload`](crate::Payload) before reducers run. This matches the
/// historical JSON layout, so an old `events.json` dump deserializes directly
/// into `Vec<EventRecord>`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventRecord {
    pub metadata: EventMeta,
    pub payload: Value,
}

impl EventRecord {
    /// Create a record stamped with the current time and a fresh `evt_` id.
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self::with_prefix(event_type, "evt_", payload)
    }

    /// Create a record whose uuid carries an entity-specific prefix.
    ///
    /// Drug and interaction ids are the uuid of their creating event, so
    /// `DrugAdded` records mint `drug_` ids and `InteractionAdded` records
    /// mint `int_` ids.
    pub fn with_prefix(
        event_type: impl Into<String>,
        prefix: &str,
        payload: Value,
    ) -> Self {
        EventRecord {
            metadata: EventMeta {
                event_type: event_type.into(),
                timestamp: now_seconds(),
                uuid: format!("{}{}", prefix, Uuid::new_v4().simple()),
            },
            payload,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.metadata.event_type
    }

    pub fn uuid(&self) -> &str {
        &self.metadata.uuid
    }

    pub fn timestamp(&self) -> f64 {
        self.metadata.timestamp
    }
}

fn now_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_stamps_time_and_prefixed_uuid() {
        let record = EventRecord::new("DrugDeleted", json!({ "drugId": "drug_1" }));
        assert_eq!(record.event_type(), "DrugDeleted");
        assert!(record.uuid().starts_with("evt_"));
        assert!(record.timestamp() > 0.0);
    }

    #[test]
    fn with_prefix_mints_entity_ids() {
        let drug = EventRecord::with_prefix("DrugAdded", "drug_", json!({ "drug": "ASPIRINE" }));
        let interaction = EventRecord::with_prefix("InteractionAdded", "int_", json!({}));
        assert!(drug.uuid().starts_with("drug_"));
        assert!(interaction.uuid().starts_with("int_"));
    }

    #[test]
    fn uuids_are_unique() {
        let a = EventRecord::new("DrugDeleted", Value::Null);
        let b = EventRecord::new("DrugDeleted", Value::Null);
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn serializes_with_nested_metadata_object() {
        let record = EventRecord::new("DrugDeleted", json!({ "drugId": "drug_1" }));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["metadata"]["event_type"], "DrugDeleted");
        assert_eq!(value["payload"]["drugId"], "drug_1");
    }

    #[test]
    fn deserializes_historical_log_layout() {
        let json = r#"{
            "metadata": {
                "event_type": "DrugAdded",
                "timestamp": 1700000000.25,
                "uuid": "drug_1700000000_abc1234"
            },
            "payload": { "drug": "WARFARINE", "drug_details": [] }
        }"#;
        let record: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.event_type(), "DrugAdded");
        assert_eq!(record.uuid(), "drug_1700000000_abc1234");
        assert_eq!(record.timestamp(), 1700000000.25);
        assert_eq!(record.payload["drug"], "WARFARINE");
    }
}
