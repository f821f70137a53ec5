//! Legacy payload decoding.
//!
//! The log spans several generations of payload shapes: interactions recorded
//! by drug name instead of id, severity embedded in free text instead of an
//! explicit field, descriptions stored as line arrays instead of strings.
//! This module upgrades every historical shape to the canonical [`Payload`]
//! before reducers run, keeping compatibility logic out of projection logic.
//!
//! Decoding is total: a malformed or unrecognized record becomes
//! [`Payload::Unknown`], which folds as a no-op.

use serde_json::Value;

use crate::event::{DrugRef, Event, Payload};
use crate::record::EventRecord;
use crate::severity::Severity;

/// Decode a raw log record into a canonical event.
pub fn upcast(record: &EventRecord) -> Event {
    Event {
        uuid: record.metadata.uuid.clone(),
        timestamp: record.metadata.timestamp,
        payload: decode_payload(record),
    }
}

fn decode_payload(record: &EventRecord) -> Payload {
    let payload = &record.payload;
    let decoded = match record.event_type() {
        "DrugAdded" => drug_added(payload),
        "DrugUpdated" => drug_updated(payload),
        "DrugDeleted" => drug_deleted(payload),
        "InteractionAdded" => interaction_added(payload),
        "InteractionUpdated" => interaction_updated(payload),
        "InteractionDeleted" => interaction_deleted(payload),
        "CompositionChecked" => composition_checked(payload),
        "DrugFound" => drug_found(payload),
        _ => None,
    };
    decoded.unwrap_or_else(|| {
        tracing::debug!(
            event_type = record.event_type(),
            uuid = record.uuid(),
            "record left undecoded; replays as a no-op"
        );
        Payload::Unknown {
            event_type: record.event_type().to_string(),
        }
    })
}

fn drug_added(payload: &Value) -> Option<Payload> {
    Some(Payload::DrugAdded {
        name: required_str(payload, "drug")?,
        details: string_list(&payload["drug_details"]),
    })
}

fn drug_updated(payload: &Value) -> Option<Payload> {
    Some(Payload::DrugUpdated {
        id: required_str(payload, "id")?,
        name: required_str(payload, "name")?,
        details: string_list(&payload["details"]),
    })
}

fn drug_deleted(payload: &Value) -> Option<Payload> {
    Some(Payload::DrugDeleted {
        drug_id: required_str(payload, "drugId")?,
    })
}

fn interaction_added(payload: &Value) -> Option<Payload> {
    Some(Payload::InteractionAdded {
        drug1: drug_ref(payload, "drug1Id", "drug_name1")?,
        drug2: drug_ref(payload, "drug2Id", "drug_name2")?,
        severity: explicit_severity(payload),
        description: text(&payload["description"]),
        reco: optional_str(payload, "reco"),
        reco_details: string_list(&payload["reco_details"]),
    })
}

fn interaction_updated(payload: &Value) -> Option<Payload> {
    Some(Payload::InteractionUpdated {
        id: required_str(payload, "id")?,
        severity: explicit_severity(payload),
        description: text(&payload["description"]),
        reco: optional_str(payload, "reco"),
        reco_details: string_list(&payload["reco_details"]),
    })
}

fn interaction_deleted(payload: &Value) -> Option<Payload> {
    Some(Payload::InteractionDeleted {
        interaction_id: required_str(payload, "interactionId")?,
    })
}

fn composition_checked(payload: &Value) -> Option<Payload> {
    Some(Payload::CompositionChecked {
        drug_id: required_str(payload, "drugId")?,
        count: payload["count"].as_u64().unwrap_or(0),
        error: payload["error"].as_str().map(str::to_string),
    })
}

fn drug_found(payload: &Value) -> Option<Payload> {
    Some(Payload::DrugFound {
        drug_name: required_str(payload, "drugName")?,
        data: payload["data"].clone(),
        error: payload["error"].as_bool().unwrap_or(false),
    })
}

/// Prefer the explicit id field; fall back to the legacy name field.
/// Empty strings count as absent, mirroring the original truthiness checks.
fn drug_ref(payload: &Value, id_key: &str, name_key: &str) -> Option<DrugRef> {
    if let Some(id) = nonempty_str(payload, id_key) {
        return Some(DrugRef::ById(id));
    }
    nonempty_str(payload, name_key).map(DrugRef::ByName)
}

/// An explicit `severity` field wins over derivation, but only when it holds
/// a recognized label; empty or garbage labels fall through to derivation.
fn explicit_severity(payload: &Value) -> Option<Severity> {
    payload["severity"].as_str().and_then(Severity::parse)
}

/// Normalize a description field: line arrays join with a single space,
/// plain strings pass through, anything else is empty.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn required_str(payload: &Value, key: &str) -> Option<String> {
    payload[key].as_str().map(str::to_string)
}

fn nonempty_str(payload: &Value, key: &str) -> Option<String> {
    payload[key]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_str(payload: &Value, key: &str) -> String {
    payload[key].as_str().unwrap_or_default().to_string()
}
