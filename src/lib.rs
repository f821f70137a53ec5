//! Event-sourced drug-interaction reference core.
//!
//! The append-only event log is the single source of truth; the projected
//! state (drugs, interactions, derived lookup caches) is rebuilt by folding
//! the log in timestamp order. Legacy payload shapes are upgraded by an
//! explicit upcast stage before reducers run, commands are validated against
//! the current projection before an event is emitted, and external lookups
//! record their outcome as event data rather than failing the command.

mod app;
mod command;
mod event;
mod fold;
mod handler;
mod record;
mod reducer;
mod service;
mod severity;
mod state;
mod store;
mod upcast;

#[cfg(feature = "http")]
mod http;

pub use app::{App, AppError};
pub use command::{Command, CommandError};
pub use event::{DrugRef, Event, Payload};
pub use fold::{apply_record, fold, replay};
pub use handler::handle;
pub use record::{EventMeta, EventRecord};
pub use reducer::apply;
pub use service::{CompositionOutcome, DrugInfoService, LookupOutcome};
pub use severity::{derive_severity, Severity};
pub use state::{AppState, CompositionResult, Drug, Interaction, LookupResult};
pub use store::{EventLog, InMemoryLog, LogError};
pub use upcast::upcast;

#[cfg(feature = "http")]
pub use http::{HttpDrugInfoService, ServiceConfigError};
