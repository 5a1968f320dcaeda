//! Remote Command Demo
//!
//! Drives the command orchestrator against the simulated gateway and prints
//! every state change, countdown tick and history entry.
//!
//! Usage:
//!   cargo run --example remote_start -- [OPTIONS]
//!
//! Options:
//!   --engine ID       Engine id from the catalog (default: diesel-6.6-duramax)
//!   --temp F          Simulated outside temperature in °F (default: 28)
//!   --config PATH     Orchestrator config JSON file
//!   --fail            Make the start command fail
//!   --list-engines    Print the engine catalog and exit
//!
//! Set RUST_LOG=trucklink_core=debug for orchestrator logs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;
use trucklink_core::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut engine_id = "diesel-6.6-duramax".to_string();
    let mut outside_temp_f = 28.0;
    let mut config = OrchestratorConfig::default();
    let mut fail = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--engine" => {
                i += 1;
                engine_id = args.get(i).context("--engine needs a value")?.clone();
            }
            "--temp" => {
                i += 1;
                outside_temp_f = args
                    .get(i)
                    .context("--temp needs a value")?
                    .parse()
                    .context("--temp must be a number")?;
            }
            "--config" => {
                i += 1;
                let path = args.get(i).context("--config needs a value")?;
                config = OrchestratorConfig::load(path)
                    .with_context(|| format!("loading {}", path))?;
            }
            "--fail" => fail = true,
            "--list-engines" => {
                for engine in EngineCatalog::all() {
                    println!(
                        "{:<24} {:<36} {:<7} {}s",
                        engine.id, engine.name, engine.fuel_type, engine.glow_plug_seconds
                    );
                }
                return Ok(());
            }
            other => bail!("unknown option: {}", other),
        }
        i += 1;
    }

    let engine = EngineCatalog::by_id(&engine_id)
        .with_context(|| format!("unknown engine '{}', try --list-engines", engine_id))?;

    let gateway = Arc::new(SimulatedGateway::new().with_latency(200, 500));
    gateway.set_outside_temp_f(outside_temp_f);

    let vehicle = Vehicle::new("Ford", "Super Duty", 2022)
        .with_nickname("Work Truck")
        .with_engine(engine);
    let vehicle = gateway.update_vehicle(&vehicle).await?;

    println!("TruckLink demo v{}", trucklink_core::VERSION);
    println!("Vehicle: {} ({})", vehicle.display_name(), engine.name);

    let orchestrator = Arc::new(CommandOrchestrator::new(gateway.clone(), config));
    orchestrator.select_vehicle(Some(vehicle));

    let mut states = orchestrator.subscribe_state();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            match state {
                OrchestratorState::Idle => println!("  state: idle"),
                OrchestratorState::Sending(kind) => println!("  state: sending {}", kind),
                OrchestratorState::Success(msg) => println!("  state: {}", msg),
                OrchestratorState::Error(msg) => println!("  state: error: {}", msg),
            }
        }
    });

    let mut diagnostics = orchestrator.subscribe_diagnostics();
    tokio::spawn(async move {
        while diagnostics.changed().await.is_ok() {
            if let Some(diag) = diagnostics.borrow_and_update().clone() {
                if diag.should_run_glow_plugs && diag.remaining_seconds > 0 {
                    println!("  glow plugs: {}s remaining", diag.remaining_seconds);
                }
            }
        }
    });

    let status = orchestrator.refresh_status().await?;
    println!(
        "Status: {}, engine {}, fuel {:.0}%, {:.1}V, outside {:.0}°F",
        if status.is_locked { "locked" } else { "unlocked" },
        if status.engine_running { "running" } else { "off" },
        status.fuel_percent(),
        status.battery_voltage,
        status.outside_temp_f
    );

    let display = orchestrator.config().result_display() + Duration::from_millis(100);

    println!("> unlock");
    report(orchestrator.request_unlock().await);
    tokio::time::sleep(display).await;

    if fail {
        gateway.fail_next_command();
    }
    println!("> start");
    report(orchestrator.request_start().await);
    if let Some(diag) = orchestrator.glow_plug_diagnostics() {
        println!(
            "Glow plugs {} ({:.0}°F vs threshold {:.0}°F, {})",
            if diag.should_run_glow_plugs { "ran" } else { "skipped" },
            diag.outside_temp_f,
            diag.threshold_f,
            diag.engine_name
        );
    }
    tokio::time::sleep(display).await;

    println!("> lock");
    report(orchestrator.request_lock().await);
    tokio::time::sleep(display).await;

    println!("History (newest first):");
    for record in orchestrator.history() {
        println!(
            "  {} {:<6} {}",
            record.timestamp.format("%H:%M:%S"),
            record.kind,
            if record.success { "ok" } else { "failed" }
        );
    }

    orchestrator.shutdown();
    Ok(())
}

fn report(result: Result<(), OrchestratorError>) {
    if let Err(e) = result {
        println!("  -> {}", e);
    }
}
