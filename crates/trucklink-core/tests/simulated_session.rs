use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use trucklink_core::prelude::*;

/// Weather service that always reports a cold morning
struct ColdMorning;

#[async_trait]
impl TemperatureProvider for ColdMorning {
    async fn outside_temperature_f(&self, _location: Location) -> Result<f64, GatewayError> {
        Ok(18.0)
    }
}

struct ParkingLot;

#[async_trait]
impl LocationProvider for ParkingLot {
    async fn current_location(&self) -> Option<Location> {
        Some(Location::new(61.22, -149.9))
    }
}

fn duramax_truck() -> Vehicle {
    let engine = EngineCatalog::by_id("diesel-6.6-duramax").unwrap();
    Vehicle::new("GMC", "Sierra 2500HD", 2022).with_engine(engine)
}

#[tokio::test(start_paused = true)]
async fn test_enriched_temperature_drives_prewarm() {
    let gateway = Arc::new(SimulatedGateway::new().with_seed(42).with_latency(100, 100));
    gateway.set_outside_temp_f(70.0);

    let cache = StatusCache::new()
        .with_location_provider(Arc::new(ParkingLot))
        .with_temperature_provider(Arc::new(ColdMorning));
    let orchestrator = CommandOrchestrator::new(gateway.clone(), OrchestratorConfig::default())
        .with_status_cache(cache);
    orchestrator.select_vehicle(Some(duramax_truck()));

    let status = orchestrator.refresh_status().await.unwrap();
    assert_eq!(status.outside_temp_f, 18.0);
    assert_eq!(status.location, Location::new(61.22, -149.9));

    let started = Instant::now();
    orchestrator.request_start().await.unwrap();

    let diag = orchestrator.glow_plug_diagnostics().unwrap();
    assert!(diag.should_run_glow_plugs);
    assert_eq!(diag.location, Some(Location::new(61.22, -149.9)));
    // 10 s glow-plug cycle, 100 ms dispatch, 100 ms refresh
    assert_eq!(started.elapsed(), Duration::from_millis(10_200));

    assert_eq!(gateway.sent_commands(), vec![CommandKind::Start]);
    assert!(orchestrator.status().current().unwrap().engine_running);
}

#[tokio::test(start_paused = true)]
async fn test_session_against_simulator() {
    let gateway = Arc::new(SimulatedGateway::new().with_seed(1).with_latency(50, 300));
    let orchestrator = CommandOrchestrator::new(gateway.clone(), OrchestratorConfig::default());
    let engine = EngineCatalog::by_id("gas-3.5-ecoboost").unwrap();
    orchestrator.select_vehicle(Some(Vehicle::new("Ford", "F-150", 2020).with_engine(engine)));

    orchestrator.request_unlock().await.unwrap();
    assert!(!orchestrator.status().current().unwrap().is_locked);
    tokio::time::sleep(Duration::from_millis(2100)).await;

    gateway.fail_next_command();
    assert!(matches!(
        orchestrator.request_lock().await,
        Err(OrchestratorError::Dispatch(GatewayError::Rejected(_)))
    ));
    tokio::time::sleep(Duration::from_millis(2100)).await;

    orchestrator.request_lock().await.unwrap();
    assert!(orchestrator.status().current().unwrap().is_locked);

    let outcomes: Vec<_> = orchestrator
        .history()
        .iter()
        .map(|r| (r.kind, r.success))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (CommandKind::Lock, true),
            (CommandKind::Lock, false),
            (CommandKind::Unlock, true),
        ]
    );
}
