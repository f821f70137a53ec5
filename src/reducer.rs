//! One pure reducer per event type.
//!
//! Reducers are permissive by design: they tolerate historically-invalid data
//! (dangling ids, duplicate pairs, unresolvable names) and never fail.
//! Business rules live in the command handlers, which gate what gets appended
//! to the log in the first place.

use crate::event::{DrugRef, Event, Payload};
use crate::severity::{derive_severity, Severity};
use crate::state::{AppState, CompositionResult, Drug, Interaction, LookupResult};

/// Apply one decoded event to the projection.
///
/// Dispatch is a closed match over the canonical payload variants;
/// `Payload::Unknown` is a safe no-op so old code survives future event types.
pub fn apply(state: &mut AppState, event: &Event) {
    match &event.payload {
        Payload::DrugAdded { name, details } => {
            drug_added(state, event, name, details);
        }
        Payload::DrugUpdated { id, name, details } => {
            drug_updated(state, id, name, details);
        }
        Payload::DrugDeleted { drug_id } => {
            drug_deleted(state, drug_id);
        }
        Payload::InteractionAdded {
            drug1,
            drug2,
            severity,
            description,
            reco,
            reco_details,
        } => {
            interaction_added(
                state,
                event,
                drug1,
                drug2,
                *severity,
                description,
                reco,
                reco_details,
            );
        }
        Payload::InteractionUpdated {
            id,
            severity,
            description,
            reco,
            reco_details,
        } => {
            interaction_updated(state, id, *severity, description, reco, reco_details);
        }
        Payload::InteractionDeleted { interaction_id } => {
            state.interactions.remove(interaction_id);
        }
        Payload::CompositionChecked {
            drug_id,
            count,
            error,
        } => {
            composition_checked(state, event, drug_id, *count, error);
        }
        Payload::DrugFound {
            drug_name,
            data,
            error,
        } => {
            drug_found(state, event, drug_name, data, *error);
        }
        Payload::Unknown { event_type } => {
            tracing::trace!(%event_type, "ignoring unknown event type");
        }
    }
}

fn drug_added(state: &mut AppState, event: &Event, name: &str, details: &[String]) {
    state.drugs.insert(
        event.uuid.clone(),
        Drug {
            id: event.uuid.clone(),
            name: name.to_string(),
            details: details.to_vec(),
        },
    );
}

fn drug_updated(state: &mut AppState, id: &str, name: &str, details: &[String]) {
    if let Some(drug) = state.drugs.get_mut(id) {
        drug.name = name.to_string();
        drug.details = details.to_vec();
    }
}

/// Tombstone with cascade: removing a drug also removes every interaction
/// referencing it, immediately, so later events in timestamp order see the
/// cleaned-up projection.
fn drug_deleted(state: &mut AppState, drug_id: &str) {
    state.drugs.remove(drug_id);
    state.interactions.retain(|_, i| !i.references(drug_id));
}

#[allow(clippy::too_many_arguments)]
fn interaction_added(
    state: &mut AppState,
    event: &Event,
    drug1: &DrugRef,
    drug2: &DrugRef,
    severity: Option<Severity>,
    description: &str,
    reco: &str,
    reco_details: &[String],
) {
    let (Some(drug1_id), Some(drug2_id)) = (resolve(state, drug1), resolve(state, drug2)) else {
        // Unresolvable legacy reference: dropped from the projection, never an
        // error. Surfaced on the diagnostic channel so it is not fully silent.
        tracing::warn!(
            uuid = %event.uuid,
            ?drug1,
            ?drug2,
            "dropping interaction with unresolvable drug reference"
        );
        return;
    };
    state.interactions.insert(
        event.uuid.clone(),
        Interaction {
            id: event.uuid.clone(),
            drug1_id,
            drug2_id,
            severity: severity.unwrap_or_else(|| derive_severity(reco)),
            description: description.to_string(),
            reco: reco.to_string(),
            reco_details: reco_details.to_vec(),
        },
    );
}

fn interaction_updated(
    state: &mut AppState,
    id: &str,
    severity: Option<Severity>,
    description: &str,
    reco: &str,
    reco_details: &[String],
) {
    if let Some(interaction) = state.interactions.get_mut(id) {
        interaction.description = description.to_string();
        interaction.reco = reco.to_string();
        interaction.reco_details = reco_details.to_vec();
        // Recomputed under the same rule as on add, so severity tracks the
        // current reco text even when the event only patches reco.
        interaction.severity = severity.unwrap_or_else(|| derive_severity(reco));
    }
}

fn composition_checked(
    state: &mut AppState,
    event: &Event,
    drug_id: &str,
    count: u64,
    error: &Option<String>,
) {
    state.composition_results.insert(
        drug_id.to_string(),
        CompositionResult {
            drug_id: drug_id.to_string(),
            count,
            error: error.clone(),
            timestamp: event.timestamp,
        },
    );
}

fn drug_found(
    state: &mut AppState,
    event: &Event,
    drug_name: &str,
    data: &serde_json::Value,
    error: bool,
) {
    state.lookup_results.insert(
        drug_name.to_string(),
        LookupResult {
            drug_name: drug_name.to_string(),
            data: data.clone(),
            error,
            timestamp: event.timestamp,
        },
    );
}

/// Ids pass through unchecked (the log is trusted for id-based payloads);
/// legacy name references must resolve against the live projection.
fn resolve(state: &AppState, drug: &DrugRef) -> Option<String> {
    match drug {
        DrugRef::ById(id) => Some(id.clone()),
        DrugRef::ByName(name) => state.find_drug_by_name(name).map(|d| d.id.clone()),
    }
}
