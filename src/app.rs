use std::fmt;

use crate::command::{Command, CommandError};
use crate::fold::{apply_record, replay};
use crate::handler::handle;
use crate::service::DrugInfoService;
use crate::state::AppState;
use crate::store::{EventLog, LogError};

/// Error from executing a command through the application service.
#[derive(Debug)]
pub enum AppError {
    /// The command was rejected by a business rule; nothing was appended.
    Command(CommandError),
    /// The event log collaborator failed.
    Log(LogError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Command(e) => write!(f, "command rejected: {}", e),
            AppError::Log(e) => write!(f, "event log error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Command(e) => Some(e),
            AppError::Log(e) => Some(e),
        }
    }
}

impl From<CommandError> for AppError {
    fn from(err: CommandError) -> Self {
        AppError::Command(err)
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        AppError::Log(err)
    }
}

/// The application service: owns the log handle, the external service, and
/// the last-computed projection.
///
/// Single-writer model: all mutation funnels through [`App::execute`], which
/// appends one event and applies it incrementally. The held state is treated
/// as immutable-until-replaced, so handing out `&AppState` to concurrent
/// readers is safe between commands.
pub struct App<S: DrugInfoService> {
    log: Box<dyn EventLog>,
    service: S,
    state: AppState,
}

impl<S: DrugInfoService> App<S> {
    /// Read the full log and fold it into the initial projection.
    pub fn load(log: Box<dyn EventLog>, service: S) -> Result<Self, AppError> {
        let records = log.read_all()?;
        let state = replay(&records);
        tracing::info!(
            events = records.len(),
            drugs = state.drug_count(),
            interactions = state.interaction_count(),
            "projection loaded from event log"
        );
        Ok(App {
            log,
            service,
            state,
        })
    }

    /// Validate and execute one command: handle, append, apply.
    ///
    /// On rejection nothing is appended and the projection is unchanged.
    pub fn execute(&mut self, command: Command) -> Result<&AppState, AppError> {
        let span = tracing::info_span!("execute", command = command.name());
        let _enter = span.enter();

        let record = handle(&self.state, command, &self.service)?;
        self.log.append(record.clone())?;
        apply_record(&mut self.state, &record);
        tracing::debug!(event_type = record.event_type(), uuid = record.uuid(), "event appended");
        Ok(&self.state)
    }

    /// Re-derive the projection from scratch by replaying the whole log.
    ///
    /// Incremental application keeps the state consistent on its own; this is
    /// for recovery and for verifying log/projection agreement.
    pub fn rebuild(&mut self) -> Result<&AppState, AppError> {
        let records = self.log.read_all()?;
        self.state = replay(&records);
        Ok(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}
