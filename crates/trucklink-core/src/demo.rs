//! Demo Mode - Simulated vehicle gateway for testing
//!
//! Answers commands and status requests for a pretend truck without any
//! network access. Commands change the simulated status, responses arrive
//! after a randomized latency, and failures can be injected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::gateway::{CommandKind, GatewayError, VehicleGateway};
use crate::vehicle::{Location, Vehicle, VehicleStatus};

/// In-process gateway simulating one truck
pub struct SimulatedGateway {
    /// Current simulated status
    status: Mutex<VehicleStatus>,
    /// Commands received, oldest first
    sent: Mutex<Vec<CommandKind>>,
    /// Response latency range in milliseconds
    latency_ms: (u64, u64),
    /// Fail the next command once
    fail_next_command: AtomicBool,
    /// Fail the next status fetch once
    fail_next_fetch: AtomicBool,
    /// Random number generator (thread-safe)
    rng: Mutex<StdRng>,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedGateway {
    /// Create a simulator for a parked, locked truck on a cold morning
    pub fn new() -> Self {
        Self::with_status(VehicleStatus {
            is_locked: true,
            engine_running: false,
            fuel_level: 0.62,
            battery_voltage: 12.6,
            outside_temp_f: 28.0,
            cabin_temp_f: Some(31.0),
            location: Location::new(44.98, -93.27),
        })
    }

    /// Create a simulator starting from the given status
    pub fn with_status(status: VehicleStatus) -> Self {
        Self {
            status: Mutex::new(status),
            sent: Mutex::new(Vec::new()),
            latency_ms: (150, 600),
            fail_next_command: AtomicBool::new(false),
            fail_next_fetch: AtomicBool::new(false),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Set the response latency range (milliseconds, inclusive)
    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms.min(max_ms), max_ms.max(min_ms));
        self
    }

    /// Use a fixed seed for reproducible latency and sensor noise
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Make the next `send_command` fail
    pub fn fail_next_command(&self) {
        self.fail_next_command.store(true, Ordering::SeqCst);
    }

    /// Make the next `fetch_status` fail
    pub fn fail_next_fetch(&self) {
        self.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    /// Change the simulated outside temperature (°F)
    pub fn set_outside_temp_f(&self, temp_f: f64) {
        self.lock_status().outside_temp_f = temp_f;
    }

    /// Snapshot of the simulated status
    pub fn status(&self) -> VehicleStatus {
        self.lock_status().clone()
    }

    /// Commands received so far
    pub fn sent_commands(&self) -> Vec<CommandKind> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_status(&self) -> std::sync::MutexGuard<'_, VehicleStatus> {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        let delay = {
            let (min, max) = self.latency_ms;
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(min..=max)
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    fn apply(&self, kind: CommandKind) {
        let mut status = self.lock_status();
        match kind {
            CommandKind::Lock => status.is_locked = true,
            CommandKind::Unlock => status.is_locked = false,
            CommandKind::Start => {
                status.engine_running = true;
                status.battery_voltage = 14.1;
            }
            CommandKind::Stop => {
                status.engine_running = false;
                status.battery_voltage = 12.6;
            }
            CommandKind::Honk => {}
        }
    }
}

#[async_trait]
impl VehicleGateway for SimulatedGateway {
    async fn fetch_status(&self, vehicle: &Vehicle) -> Result<VehicleStatus, GatewayError> {
        self.simulate_latency().await;
        if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Unreachable(format!(
                "{} did not answer",
                vehicle.display_name()
            )));
        }

        let ripple = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen_range(-0.05..0.05)
        };
        let mut status = self.status();
        status.battery_voltage += ripple;
        Ok(status)
    }

    async fn send_command(&self, kind: CommandKind, vehicle: &Vehicle) -> Result<(), GatewayError> {
        self.simulate_latency().await;
        if self.fail_next_command.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Rejected(format!(
                "{} refused {}",
                vehicle.display_name(),
                kind
            )));
        }

        debug!(command = %kind, vehicle = %vehicle.id, "simulated command applied");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(kind);
        self.apply(kind);
        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, GatewayError> {
        self.simulate_latency().await;
        Ok(vehicle.clone())
    }
}
