use serde_json::Value;

use crate::severity::Severity;

/// How an `InteractionAdded` payload identifies a participating drug.
///
/// Current payloads carry drug ids. Older log entries recorded drug names
/// instead; those are resolved against the live drugs projection at fold time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrugRef {
    ById(String),
    ByName(String),
}

/// Canonical payload, one variant per event type.
///
/// The upcast stage produces these from raw [`EventRecord`](crate::EventRecord)
/// payloads, so reducers never see a legacy shape. Unrecognized or
/// undecodable event types become [`Payload::Unknown`] and fold as no-ops —
/// replay must never fail on historical data.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    DrugAdded {
        name: String,
        details: Vec<String>,
    },
    DrugUpdated {
        id: String,
        name: String,
        details: Vec<String>,
    },
    DrugDeleted {
        drug_id: String,
    },
    InteractionAdded {
        drug1: DrugRef,
        drug2: DrugRef,
        /// Explicit severity when the payload carried one; `None` tells the
        /// reducer to derive it from `reco`.
        severity: Option<Severity>,
        description: String,
        reco: String,
        reco_details: Vec<String>,
    },
    InteractionUpdated {
        id: String,
        severity: Option<Severity>,
        description: String,
        reco: String,
        reco_details: Vec<String>,
    },
    InteractionDeleted {
        interaction_id: String,
    },
    CompositionChecked {
        drug_id: String,
        count: u64,
        error: Option<String>,
    },
    DrugFound {
        drug_name: String,
        data: Value,
        error: bool,
    },
    Unknown {
        event_type: String,
    },
}

/// A fully decoded event: record identity plus its canonical payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub uuid: String,
    pub timestamp: f64,
    pub payload: Payload,
}
