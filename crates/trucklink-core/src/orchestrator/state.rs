//! Orchestrator state

use serde::{Deserialize, Serialize};

use crate::gateway::CommandKind;

/// Message shown for every failed command
pub const COMMAND_FAILED_MESSAGE: &str = "Failed to send command";

/// Observable orchestrator state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum OrchestratorState {
    /// Ready for a new command
    Idle,
    /// A command is in flight (including any pre-warm countdown)
    Sending(CommandKind),
    /// The last command completed
    Success(String),
    /// The last command failed
    Error(String),
}

impl OrchestratorState {
    /// Whether a new command may start
    pub fn is_idle(&self) -> bool {
        matches!(self, OrchestratorState::Idle)
    }

    /// Command in flight, if any
    pub fn sending(&self) -> Option<CommandKind> {
        match self {
            OrchestratorState::Sending(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Success or error text for display
    pub fn message(&self) -> Option<&str> {
        match self {
            OrchestratorState::Success(msg) | OrchestratorState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub(crate) fn success(kind: CommandKind) -> Self {
        OrchestratorState::Success(kind.success_message().to_string())
    }

    pub(crate) fn failed() -> Self {
        OrchestratorState::Error(COMMAND_FAILED_MESSAGE.to_string())
    }
}

impl Default for OrchestratorState {
    fn default() -> Self {
        OrchestratorState::Idle
    }
}
