use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::severity::Severity;

/// A reference drug. The id is the uuid of the `DrugAdded` event that created
/// it and never changes; the name and detail lines are mutable via update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: String,
    pub name: String,
    pub details: Vec<String>,
}

/// A known interaction between two distinct drugs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub drug1_id: String,
    pub drug2_id: String,
    pub severity: Severity,
    pub description: String,
    pub reco: String,
    pub reco_details: Vec<String>,
}

impl Interaction {
    /// True if the interaction links the same unordered drug pair.
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.drug1_id == a && self.drug2_id == b) || (self.drug1_id == b && self.drug2_id == a)
    }

    pub fn references(&self, drug_id: &str) -> bool {
        self.drug1_id == drug_id || self.drug2_id == drug_id
    }
}

/// Cached result of the most recent composition check for a drug.
/// Overwritten on every new check; never required to persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionResult {
    pub drug_id: String,
    pub count: u64,
    pub error: Option<String>,
    pub timestamp: f64,
}

/// Cached result of the most recent external lookup for a drug name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub drug_name: String,
    pub data: Value,
    pub error: bool,
    pub timestamp: f64,
}

/// The projected application state.
///
/// Derived, never authoritative: always reconstructible by folding the event
/// log over `AppState::default()`. Fields are crate-private so only reducers
/// mutate the projection; consumers go through the read accessors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub(crate) drugs: HashMap<String, Drug>,
    pub(crate) interactions: HashMap<String, Interaction>,
    pub(crate) composition_results: HashMap<String, CompositionResult>,
    pub(crate) lookup_results: HashMap<String, LookupResult>,
}

impl AppState {
    pub fn drug(&self, id: &str) -> Option<&Drug> {
        self.drugs.get(id)
    }

    pub fn interaction(&self, id: &str) -> Option<&Interaction> {
        self.interactions.get(id)
    }

    pub fn composition_result(&self, drug_id: &str) -> Option<&CompositionResult> {
        self.composition_results.get(drug_id)
    }

    pub fn lookup_result(&self, drug_name: &str) -> Option<&LookupResult> {
        self.lookup_results.get(drug_name)
    }

    pub fn drug_count(&self) -> usize {
        self.drugs.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// Exact-match lookup by stored name. Legacy interaction payloads resolve
    /// their name references through this; names were uppercased at creation,
    /// so the match is deliberately case-sensitive.
    pub fn find_drug_by_name(&self, name: &str) -> Option<&Drug> {
        self.drugs.values().find(|d| d.name == name)
    }

    /// Drugs ordered for display: by name, case-insensitive, ties broken by id.
    pub fn drugs_sorted(&self) -> Vec<&Drug> {
        let mut drugs: Vec<&Drug> = self.drugs.values().collect();
        drugs.sort_by(|a, b| {
            (a.name.to_lowercase(), &a.id).cmp(&(b.name.to_lowercase(), &b.id))
        });
        drugs
    }

    /// Interactions ordered for display: by the first drug's name
    /// (case-insensitive, missing drugs sort first), ties broken by
    /// interaction id.
    pub fn interactions_sorted(&self) -> Vec<&Interaction> {
        let mut interactions: Vec<&Interaction> = self.interactions.values().collect();
        interactions.sort_by(|a, b| {
            let name_a = self.drug_name_lower(&a.drug1_id);
            let name_b = self.drug_name_lower(&b.drug1_id);
            (name_a, &a.id).cmp(&(name_b, &b.id))
        });
        interactions
    }

    fn drug_name_lower(&self, drug_id: &str) -> String {
        self.drugs
            .get(drug_id)
            .map(|d| d.name.to_lowercase())
            .unwrap_or_default()
    }
}
