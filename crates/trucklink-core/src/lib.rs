//! # TruckLink Core Library
//!
//! Remote command orchestration for connected trucks.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - The command orchestrator (lock, unlock, start, stop, honk) with an
//!   at-most-one-in-flight guard
//! - Diesel glow-plug pre-warm before remote start, gated on outside temperature
//! - Vehicle status caching and refresh coordination
//! - The engine catalog and vehicle model
//! - A simulated gateway for demos and offline testing
//!
//! Transport to the vehicle is not part of this crate: integrators implement
//! [`gateway::VehicleGateway`] and hand it to the orchestrator.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trucklink_core::prelude::*;
//!
//! let gateway = Arc::new(SimulatedGateway::new());
//! let orchestrator = CommandOrchestrator::new(gateway, OrchestratorConfig::default());
//!
//! let engine = EngineCatalog::by_id("diesel-6.7-powerstroke").unwrap();
//! orchestrator.select_vehicle(Some(Vehicle::new("Ford", "F-250", 2021).with_engine(engine)));
//! orchestrator.refresh_status().await?;
//! orchestrator.request_start().await?;
//! ```

pub mod config;
pub mod demo;
pub mod gateway;
pub mod orchestrator;
pub mod status;
pub mod vehicle;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConfigError, OrchestratorConfig};
    pub use crate::demo::SimulatedGateway;
    pub use crate::gateway::{
        CommandKind, GatewayError, LocationProvider, TemperatureProvider, VehicleGateway,
    };
    pub use crate::orchestrator::{
        CommandOrchestrator, CommandRecord, GlowPlugDiagnostics, OrchestratorError,
        OrchestratorState, RejectReason,
    };
    pub use crate::status::StatusCache;
    pub use crate::vehicle::{EngineCatalog, EngineOption, FuelType, Location, Vehicle, VehicleStatus};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
