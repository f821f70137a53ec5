use std::fmt;

/// A request to change the system. Commands are validated against the current
/// projection by the handlers in [`crate::handler`]; only a command that
/// passes its business rules produces an event.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    AddDrug {
        name: String,
        details: Vec<String>,
    },
    UpdateDrug {
        id: String,
        name: String,
        details: Vec<String>,
    },
    DeleteDrug {
        drug_id: String,
    },
    AddInteraction {
        drug1_id: String,
        drug2_id: String,
        description: String,
        reco: String,
        reco_details: Vec<String>,
    },
    UpdateInteraction {
        id: String,
        description: String,
        reco: String,
        reco_details: Vec<String>,
    },
    DeleteInteraction {
        interaction_id: String,
    },
    CheckComposition {
        drug_id: String,
    },
    LookupDrug {
        drug_name: String,
    },
}

impl Command {
    /// Stable name for logging and dispatch diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddDrug { .. } => "AddDrug",
            Command::UpdateDrug { .. } => "UpdateDrug",
            Command::DeleteDrug { .. } => "DeleteDrug",
            Command::AddInteraction { .. } => "AddInteraction",
            Command::UpdateInteraction { .. } => "UpdateInteraction",
            Command::DeleteInteraction { .. } => "DeleteInteraction",
            Command::CheckComposition { .. } => "CheckComposition",
            Command::LookupDrug { .. } => "LookupDrug",
        }
    }
}

/// Why a command was rejected. A rejected command produces no event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Malformed command input (e.g. a too-short drug name).
    Validation(String),
    /// A live drug already uses this name (case-insensitive).
    DuplicateName(String),
    /// The unordered drug pair already has a live interaction.
    DuplicateInteraction,
    /// An interaction needs two distinct drugs.
    SameDrug,
    /// The targeted drug or interaction does not exist.
    NotFound(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Validation(msg) => write!(f, "validation failed: {}", msg),
            CommandError::DuplicateName(name) => {
                write!(f, "a drug named '{}' already exists", name)
            }
            CommandError::DuplicateInteraction => {
                write!(f, "an interaction between these two drugs already exists")
            }
            CommandError::SameDrug => write!(f, "the two drugs must be different"),
            CommandError::NotFound(id) => write!(f, "not found: {}", id),
        }
    }
}

impl std::error::Error for CommandError {}
