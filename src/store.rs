use std::fmt;
use std::sync::{Arc, RwLock};

use crate::record::EventRecord;

/// Error from the event log collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    LockPoisoned(&'static str),
    /// The log source could not be parsed (e.g. a corrupt JSON dump).
    Malformed(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::LockPoisoned(operation) => {
                write!(f, "event log lock poisoned during {}", operation)
            }
            LogError::Malformed(msg) => write!(f, "malformed event log: {}", msg),
        }
    }
}

impl std::error::Error for LogError {}

/// The append-only event log, abstracted to the two operations the core
/// needs: read the entire ordered sequence, and append one record. Records
/// are never edited or removed; format and durability are the implementer's
/// concern.
pub trait EventLog: Send + Sync {
    fn read_all(&self) -> Result<Vec<EventRecord>, LogError>;
    fn append(&self, record: EventRecord) -> Result<(), LogError>;
}

/// In-memory log backed by a shared vector. Clones share the same storage,
/// so a reader handle can observe appends made through another handle.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLog {
    records: Arc<RwLock<Vec<EventRecord>>>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        InMemoryLog::default()
    }

    pub fn from_records(records: Vec<EventRecord>) -> Self {
        InMemoryLog {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Seed the log from a JSON dump of the historical `events.json` layout.
    pub fn from_json(json: &str) -> Result<Self, LogError> {
        let records: Vec<EventRecord> =
            serde_json::from_str(json).map_err(|e| LogError::Malformed(e.to_string()))?;
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.read().map_or(0, |r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventLog for InMemoryLog {
    fn read_all(&self) -> Result<Vec<EventRecord>, LogError> {
        let records = self
            .records
            .read()
            .map_err(|_| LogError::LockPoisoned("read"))?;
        Ok(records.clone())
    }

    fn append(&self, record: EventRecord) -> Result<(), LogError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| LogError::LockPoisoned("append"))?;
        records.push(record);
        Ok(())
    }
}
