//! Command handlers: business-rule validation and event emission.
//!
//! Each handler reads the current projection, validates the command, and on
//! success returns exactly one new [`EventRecord`]. Handlers never mutate
//! state — the caller appends the record to the log and re-derives the
//! projection. The only I/O happens in the composition/lookup handlers, which
//! delegate to the external [`DrugInfoService`] collaborator; even a failed
//! external call still yields an event recording the error.

use serde_json::json;

use crate::command::{Command, CommandError};
use crate::record::EventRecord;
use crate::service::DrugInfoService;
use crate::state::AppState;

/// Dispatch a command to its handler.
pub fn handle(
    state: &AppState,
    command: Command,
    service: &dyn DrugInfoService,
) -> Result<EventRecord, CommandError> {
    match command {
        Command::AddDrug { name, details } => handle_add_drug(state, &name, &details),
        Command::UpdateDrug { id, name, details } => {
            handle_update_drug(state, &id, &name, &details)
        }
        Command::DeleteDrug { drug_id } => Ok(handle_delete_drug(&drug_id)),
        Command::AddInteraction {
            drug1_id,
            drug2_id,
            description,
            reco,
            reco_details,
        } => handle_add_interaction(state, &drug1_id, &drug2_id, &description, &reco, &reco_details),
        Command::UpdateInteraction {
            id,
            description,
            reco,
            reco_details,
        } => handle_update_interaction(state, &id, &description, &reco, &reco_details),
        Command::DeleteInteraction { interaction_id } => {
            Ok(handle_delete_interaction(&interaction_id))
        }
        Command::CheckComposition { drug_id } => {
            handle_check_composition(state, service, &drug_id)
        }
        Command::LookupDrug { drug_name } => Ok(handle_lookup_drug(service, &drug_name)),
    }
}

pub fn handle_add_drug(
    state: &AppState,
    name: &str,
    details: &[String],
) -> Result<EventRecord, CommandError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(CommandError::Validation(
            "drug name must be at least 2 characters".into(),
        ));
    }
    if find_by_name_ci(state, name, None).is_some() {
        return Err(CommandError::DuplicateName(name.to_string()));
    }
    // Names are stored uppercased; the drug id is the event uuid.
    Ok(EventRecord::with_prefix(
        "DrugAdded",
        "drug_",
        json!({
            "drug": name.to_uppercase(),
            "drug_details": details,
        }),
    ))
}

pub fn handle_update_drug(
    state: &AppState,
    id: &str,
    name: &str,
    details: &[String],
) -> Result<EventRecord, CommandError> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return Err(CommandError::Validation(
            "drug name must be at least 2 characters".into(),
        ));
    }
    if state.drug(id).is_none() {
        return Err(CommandError::NotFound(id.to_string()));
    }
    if find_by_name_ci(state, name, Some(id)).is_some() {
        return Err(CommandError::DuplicateName(name.to_string()));
    }
    Ok(EventRecord::new(
        "DrugUpdated",
        json!({
            "id": id,
            "name": name,
            "details": details,
        }),
    ))
}

/// No precondition: deleting an absent drug replays as a no-op.
pub fn handle_delete_drug(drug_id: &str) -> EventRecord {
    EventRecord::new("DrugDeleted", json!({ "drugId": drug_id }))
}

pub fn handle_add_interaction(
    state: &AppState,
    drug1_id: &str,
    drug2_id: &str,
    description: &str,
    reco: &str,
    reco_details: &[String],
) -> Result<EventRecord, CommandError> {
    if drug1_id == drug2_id {
        return Err(CommandError::SameDrug);
    }
    let duplicate = state
        .interactions
        .values()
        .any(|i| i.links(drug1_id, drug2_id));
    if duplicate {
        return Err(CommandError::DuplicateInteraction);
    }
    Ok(EventRecord::with_prefix(
        "InteractionAdded",
        "int_",
        json!({
            "drug1Id": drug1_id,
            "drug2Id": drug2_id,
            "description": lines(description),
            "reco": reco,
            "reco_details": normalize_lines(reco_details),
        }),
    ))
}

pub fn handle_update_interaction(
    state: &AppState,
    id: &str,
    description: &str,
    reco: &str,
    reco_details: &[String],
) -> Result<EventRecord, CommandError> {
    if state.interaction(id).is_none() {
        return Err(CommandError::NotFound(id.to_string()));
    }
    // Only description, reco and reco_details are patchable; drug ids and the
    // interaction id are fixed at creation.
    Ok(EventRecord::new(
        "InteractionUpdated",
        json!({
            "id": id,
            "description": lines(description),
            "reco": reco,
            "reco_details": normalize_lines(reco_details),
        }),
    ))
}

/// No precondition: deleting an absent interaction replays as a no-op.
pub fn handle_delete_interaction(interaction_id: &str) -> EventRecord {
    EventRecord::new(
        "InteractionDeleted",
        json!({ "interactionId": interaction_id }),
    )
}

pub fn handle_check_composition(
    state: &AppState,
    service: &dyn DrugInfoService,
    drug_id: &str,
) -> Result<EventRecord, CommandError> {
    let drug = state
        .drug(drug_id)
        .ok_or_else(|| CommandError::NotFound(drug_id.to_string()))?;
    let outcome = service.fetch_composition(&drug.name);
    if let Some(error) = &outcome.error {
        tracing::warn!(drug = %drug.name, %error, "composition check failed; recording error");
    }
    Ok(EventRecord::new(
        "CompositionChecked",
        json!({
            "drugId": drug_id,
            "count": outcome.count,
            "error": outcome.error,
        }),
    ))
}

/// No precondition: the lookup is keyed by free-form name and the event
/// records whatever the external service answered, error included.
pub fn handle_lookup_drug(service: &dyn DrugInfoService, drug_name: &str) -> EventRecord {
    let outcome = service.fetch_drug_info(drug_name);
    EventRecord::new(
        "DrugFound",
        json!({
            "drugName": drug_name,
            "data": outcome.data,
            "error": outcome.error,
        }),
    )
}

fn find_by_name_ci<'a>(
    state: &'a AppState,
    name: &str,
    exclude_id: Option<&str>,
) -> Option<&'a crate::state::Drug> {
    let needle = name.to_lowercase();
    state
        .drugs
        .values()
        .find(|d| d.name.to_lowercase() == needle && Some(d.id.as_str()) != exclude_id)
}

/// Split free text into non-blank lines, the form the historical payloads use
/// for descriptions and recommendation details.
fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_lines(items: &[String]) -> Vec<String> {
    items.iter().flat_map(|item| lines(item)).collect()
}
