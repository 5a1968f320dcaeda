//! Shared test helpers

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use trucklink_core::prelude::*;

/// Mock gateway recording every call with its (virtual) time
pub struct MockGateway {
    pub status: Mutex<VehicleStatus>,
    pub sent: Mutex<Vec<(CommandKind, Instant)>>,
    pub fetches: AtomicUsize,
    pub latency: Duration,
    pub fail_commands: Mutex<bool>,
    pub fail_fetches: Mutex<bool>,
}

impl MockGateway {
    pub fn new(status: VehicleStatus) -> Self {
        Self {
            status: Mutex::new(status),
            sent: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            latency: Duration::from_millis(100),
            fail_commands: Mutex::new(false),
            fail_fetches: Mutex::new(false),
        }
    }

    pub fn with_outside_temp(temp_f: f64) -> Self {
        Self::new(VehicleStatus {
            outside_temp_f: temp_f,
            fuel_level: 0.75,
            location: Location::new(46.87, -113.99),
            ..Default::default()
        })
    }

    pub fn set_fail_commands(&self, fail: bool) {
        *self.fail_commands.lock().unwrap() = fail;
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        *self.fail_fetches.lock().unwrap() = fail;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_kinds(&self) -> Vec<CommandKind> {
        self.sent.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }

    pub fn first_send_at(&self) -> Option<Instant> {
        self.sent.lock().unwrap().first().map(|(_, at)| *at)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VehicleGateway for MockGateway {
    async fn fetch_status(&self, _vehicle: &Vehicle) -> Result<VehicleStatus, GatewayError> {
        tokio::time::sleep(self.latency).await;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if *self.fail_fetches.lock().unwrap() {
            return Err(GatewayError::Timeout);
        }
        Ok(self.status.lock().unwrap().clone())
    }

    async fn send_command(&self, kind: CommandKind, _vehicle: &Vehicle) -> Result<(), GatewayError> {
        tokio::time::sleep(self.latency).await;
        if *self.fail_commands.lock().unwrap() {
            return Err(GatewayError::Rejected("vehicle asleep".to_string()));
        }
        self.sent.lock().unwrap().push((kind, Instant::now()));
        Ok(())
    }

    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, GatewayError> {
        Ok(vehicle.clone())
    }
}

pub fn gas_truck() -> Vehicle {
    let engine = EngineCatalog::by_id("gas-6.2-v8").unwrap();
    Vehicle::new("Chevrolet", "Silverado 1500", 2021).with_engine(engine)
}

/// Diesel truck with a 6 second glow-plug cycle
pub fn diesel_truck() -> Vehicle {
    let engine = EngineCatalog::by_id("diesel-3.0-powerstroke").unwrap();
    Vehicle::new("Ford", "F-150", 2019).with_engine(engine)
}

pub fn orchestrator(gateway: Arc<MockGateway>, vehicle: Option<Vehicle>) -> CommandOrchestrator {
    let orchestrator = CommandOrchestrator::new(gateway, OrchestratorConfig::default());
    orchestrator.select_vehicle(vehicle);
    orchestrator
}
