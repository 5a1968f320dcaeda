//! Command Orchestrator
//!
//! Owns the lifecycle of a remote command: the Idle guard, the diesel
//! pre-warm decision and countdown, dispatch through the gateway, the
//! follow-up status refresh, history, and the delayed return to Idle.
//!
//! State, diagnostics and status are published on `tokio::sync::watch`
//! channels so any number of observers can follow along without the core
//! knowing about them.
//!
//! ## Example
//!
//! ```rust,ignore
//! use trucklink_core::prelude::*;
//!
//! let orchestrator = CommandOrchestrator::new(gateway, OrchestratorConfig::default());
//! orchestrator.select_vehicle(Some(vehicle));
//!
//! let mut state = orchestrator.subscribe_state();
//! orchestrator.request_start().await?;
//! assert_eq!(state.borrow_and_update().message(), Some("Engine start sent."));
//! ```

mod countdown;
mod diagnostics;
mod error;
mod history;
mod state;

pub use countdown::{Countdown, CountdownCancelled};
pub use diagnostics::{glow_plugs_required, GlowPlugDiagnostics, UNKNOWN_OUTSIDE_TEMP_F};
pub use error::{OrchestratorError, RejectReason};
pub use history::{CommandHistory, CommandRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::{OrchestratorState, COMMAND_FAILED_MESSAGE};

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::gateway::{CommandKind, VehicleGateway};
use crate::status::StatusCache;
use crate::vehicle::{EngineCatalog, Vehicle, VehicleStatus};

impl From<CountdownCancelled> for OrchestratorError {
    fn from(_: CountdownCancelled) -> Self {
        OrchestratorError::Cancelled
    }
}

/// Returns the state to Idle if a command flow is dropped or cancelled
/// before it reaches a terminal state.
///
/// A flow dropped after the gateway accepted the command is recorded as a
/// failed command, since its follow-up refresh never completed.
struct InFlight<'a> {
    state: &'a watch::Sender<OrchestratorState>,
    history: &'a Mutex<CommandHistory>,
    kind: CommandKind,
    dispatched: bool,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(mut self, terminal: OrchestratorState) {
        self.armed = false;
        self.state.send_replace(terminal);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if self.dispatched {
            warn!(command = %self.kind, "command flow abandoned after dispatch, recording failure");
            self.history
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(CommandRecord::new(self.kind, false));
        } else {
            debug!(command = %self.kind, "command flow abandoned before dispatch, returning to idle");
        }
        self.state.send_replace(OrchestratorState::Idle);
    }
}

/// Remote command state machine for one selected vehicle at a time
pub struct CommandOrchestrator {
    gateway: Arc<dyn VehicleGateway>,
    config: OrchestratorConfig,
    state: Arc<watch::Sender<OrchestratorState>>,
    diagnostics: watch::Sender<Option<GlowPlugDiagnostics>>,
    history: Mutex<CommandHistory>,
    vehicle: Mutex<Option<Vehicle>>,
    status: StatusCache,
    shutdown: CancellationToken,
}

impl CommandOrchestrator {
    /// Create an orchestrator bound to a gateway
    pub fn new(gateway: Arc<dyn VehicleGateway>, config: OrchestratorConfig) -> Self {
        let (state, _) = watch::channel(OrchestratorState::Idle);
        let (diagnostics, _) = watch::channel(None);
        let history = CommandHistory::new(config.history_capacity);
        Self {
            gateway,
            config,
            state: Arc::new(state),
            diagnostics,
            history: Mutex::new(history),
            vehicle: Mutex::new(None),
            status: StatusCache::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the status cache (e.g. one with location/temperature providers)
    pub fn with_status_cache(mut self, status: StatusCache) -> Self {
        self.status = status;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> OrchestratorState {
        self.state.borrow().clone()
    }

    /// Follow state changes
    pub fn subscribe_state(&self) -> watch::Receiver<OrchestratorState> {
        self.state.subscribe()
    }

    /// Diagnostics of the latest diesel start attempt
    pub fn glow_plug_diagnostics(&self) -> Option<GlowPlugDiagnostics> {
        self.diagnostics.borrow().clone()
    }

    /// Follow diagnostics, including per-tick countdown updates
    pub fn subscribe_diagnostics(&self) -> watch::Receiver<Option<GlowPlugDiagnostics>> {
        self.diagnostics.subscribe()
    }

    /// Completed commands, newest first
    pub fn history(&self) -> Vec<CommandRecord> {
        self.lock_history().to_vec()
    }

    /// Status cache of the selected vehicle
    pub fn status(&self) -> &StatusCache {
        &self.status
    }

    /// Selected vehicle
    pub fn selected_vehicle(&self) -> Option<Vehicle> {
        self.lock_vehicle().clone()
    }

    /// Change the selected vehicle.
    ///
    /// A command already in flight keeps running against the vehicle it was
    /// issued for and still blocks new requests.
    pub fn select_vehicle(&self, vehicle: Option<Vehicle>) {
        let id = vehicle.as_ref().map(|v| v.id);
        *self.lock_vehicle() = vehicle;
        self.status.bind(id);
        debug!(vehicle = ?id, "vehicle selected");
    }

    /// Refresh the selected vehicle's status outside of any command
    pub async fn refresh_status(&self) -> Result<VehicleStatus, OrchestratorError> {
        let vehicle = self
            .selected_vehicle()
            .ok_or(OrchestratorError::Rejected(RejectReason::NoVehicleSelected))?;
        self.status
            .refresh(self.gateway.as_ref(), &vehicle)
            .await
            .map_err(OrchestratorError::Refresh)
    }

    /// Remote start (diesels may pre-warm first)
    pub async fn request_start(&self) -> Result<(), OrchestratorError> {
        self.request(CommandKind::Start).await
    }

    /// Remote engine stop
    pub async fn request_stop(&self) -> Result<(), OrchestratorError> {
        self.request(CommandKind::Stop).await
    }

    /// Lock the doors
    pub async fn request_lock(&self) -> Result<(), OrchestratorError> {
        self.request(CommandKind::Lock).await
    }

    /// Unlock the doors
    pub async fn request_unlock(&self) -> Result<(), OrchestratorError> {
        self.request(CommandKind::Unlock).await
    }

    /// Run one command for the selected vehicle.
    ///
    /// Rejected requests leave every piece of state untouched. Any other
    /// outcome ends in `Success`/`Error` followed by a delayed reset to Idle.
    pub async fn request(&self, kind: CommandKind) -> Result<(), OrchestratorError> {
        if self.shutdown.is_cancelled() {
            return Err(OrchestratorError::Rejected(RejectReason::ShutDown));
        }
        let Some(vehicle) = self.selected_vehicle() else {
            debug!(command = %kind, "command ignored, no vehicle selected");
            return Err(OrchestratorError::Rejected(RejectReason::NoVehicleSelected));
        };

        let accepted = self.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = OrchestratorState::Sending(kind);
                true
            } else {
                false
            }
        });
        if !accepted {
            debug!(command = %kind, state = ?self.state(), "command ignored, another command in flight");
            return Err(OrchestratorError::Rejected(RejectReason::CommandInFlight));
        }

        info!(command = %kind, vehicle = %vehicle.id, "sending command");
        let mut in_flight = InFlight {
            state: &self.state,
            history: &self.history,
            kind,
            dispatched: false,
            armed: true,
        };

        let result = self.execute(&mut in_flight, &vehicle).await;
        if matches!(result, Err(OrchestratorError::Cancelled)) {
            // Nothing was sent, so there is nothing to record or display.
            info!(command = %kind, "command cancelled before dispatch");
            return result;
        }
        match &result {
            Ok(()) => {
                info!(command = %kind, "command succeeded");
                in_flight.finish(OrchestratorState::success(kind));
            }
            Err(e) => {
                warn!(command = %kind, error = %e, "command failed");
                in_flight.finish(OrchestratorState::failed());
            }
        }

        self.lock_history()
            .push(CommandRecord::new(kind, result.is_ok()));
        self.schedule_reset();
        result
    }

    /// Cancel any running countdown and refuse further commands
    pub fn shutdown(&self) {
        info!("orchestrator shutting down");
        self.shutdown.cancel();
    }

    async fn execute(
        &self,
        in_flight: &mut InFlight<'_>,
        vehicle: &Vehicle,
    ) -> Result<(), OrchestratorError> {
        let kind = in_flight.kind;
        if kind == CommandKind::Start {
            self.prewarm(vehicle).await?;
        }

        self.gateway
            .send_command(kind, vehicle)
            .await
            .map_err(OrchestratorError::Dispatch)?;
        in_flight.dispatched = true;
        debug!(command = %kind, "command dispatched, refreshing status");

        self.status
            .refresh(self.gateway.as_ref(), vehicle)
            .await
            .map_err(OrchestratorError::Refresh)?;
        Ok(())
    }

    /// Glow-plug decision and countdown for a start command.
    ///
    /// Uses the cached status only; nothing is fetched here.
    async fn prewarm(&self, vehicle: &Vehicle) -> Result<(), OrchestratorError> {
        let engine = EngineCatalog::resolve_for(vehicle);
        if !engine.needs_prewarm() || engine.glow_plug_seconds == 0 {
            self.diagnostics.send_replace(None);
            debug!(engine = engine.id, "no pre-warm for engine");
            return Ok(());
        }

        let cached = self.status.current();
        let diagnostics = GlowPlugDiagnostics::evaluate(
            engine,
            cached.as_ref(),
            self.config.glow_plug_threshold_f,
        );
        let run = diagnostics.should_run_glow_plugs;
        info!(
            engine = engine.id,
            outside_temp_f = diagnostics.outside_temp_f,
            threshold_f = diagnostics.threshold_f,
            run_glow_plugs = run,
            "glow plug decision"
        );
        self.diagnostics.send_replace(Some(diagnostics));
        if !run {
            return Ok(());
        }

        let countdown = Countdown::new(
            engine.glow_plug_seconds,
            self.config.countdown_tick(),
            self.shutdown.child_token(),
        );
        countdown
            .run(|remaining| {
                debug!(remaining, "glow plug countdown");
                self.set_remaining(remaining);
            })
            .await?;
        self.set_remaining(0);
        Ok(())
    }

    fn set_remaining(&self, remaining: u32) {
        self.diagnostics.send_if_modified(|diag| match diag {
            Some(d) if d.remaining_seconds != remaining => {
                d.remaining_seconds = remaining;
                true
            }
            _ => false,
        });
    }

    /// Reset to Idle after the display delay.
    ///
    /// The timer is never cancelled and writes Idle even if a newer command
    /// has moved the state on in the meantime.
    fn schedule_reset(&self) {
        let state = Arc::clone(&self.state);
        let delay = self.config.result_display();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let previous = state.send_replace(OrchestratorState::Idle);
            if previous.sending().is_some() {
                warn!(?previous, "display reset overwrote a command in flight");
            } else {
                debug!("state reset to idle");
            }
        });
    }

    fn lock_history(&self) -> MutexGuard<'_, CommandHistory> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_vehicle(&self) -> MutexGuard<'_, Option<Vehicle>> {
        self.vehicle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for CommandOrchestrator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
