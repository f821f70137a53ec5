use serde_json::Value;

/// Result of a composition check against the external drug database:
/// the number of known compositions, or an error message when the call failed.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositionOutcome {
    pub count: u64,
    pub error: Option<String>,
}

/// Result of a drug information lookup: the raw payload the external database
/// answered with, plus an error flag (a not-found answer sets the flag and
/// carries a structured message payload).
#[derive(Clone, Debug, PartialEq)]
pub struct LookupOutcome {
    pub data: Value,
    pub error: bool,
}

/// The external drug-composition/lookup collaborator.
///
/// Deliberately infallible: implementations convert every transport, HTTP or
/// decode failure into a populated error field, so the calling command handler
/// always completes and records what happened. A failure at this boundary
/// never blocks state progression.
pub trait DrugInfoService {
    fn fetch_composition(&self, drug_name: &str) -> CompositionOutcome;
    fn fetch_drug_info(&self, drug_name: &str) -> LookupOutcome;
}

impl LookupOutcome {
    /// The outcome for a name the external database does not know.
    pub fn not_found(drug_name: &str) -> Self {
        LookupOutcome {
            data: serde_json::json!({
                "message": format!("Drug '{}' not found in the external database.", drug_name),
            }),
            error: true,
        }
    }
}
