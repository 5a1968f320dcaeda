//! Orchestrator errors

use thiserror::Error;

use crate::gateway::GatewayError;

/// Why a command request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No vehicle is selected
    NoVehicleSelected,
    /// Another command has not finished yet
    CommandInFlight,
    /// The orchestrator has been shut down
    ShutDown,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NoVehicleSelected => write!(f, "no vehicle selected"),
            RejectReason::CommandInFlight => write!(f, "a command is already in flight"),
            RejectReason::ShutDown => write!(f, "orchestrator is shut down"),
        }
    }
}

/// Errors returned from command requests.
///
/// Observers never see these directly: dispatch and refresh failures both
/// surface as the single `Error` state message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    #[error("Command rejected: {0}")]
    Rejected(RejectReason),

    #[error("Command dispatch failed: {0}")]
    Dispatch(GatewayError),

    #[error("Status refresh after command failed: {0}")]
    Refresh(GatewayError),

    #[error("Command cancelled before dispatch")]
    Cancelled,
}

impl OrchestratorError {
    /// Whether the request was ignored by the guard
    pub fn is_rejected(&self) -> bool {
        matches!(self, OrchestratorError::Rejected(_))
    }
}
