//! Remote Vehicle Gateway
//!
//! Contract for the collaborator that talks to the vehicle. Transport,
//! authentication and timeouts belong to implementations of these traits;
//! the orchestrator only consumes them.

pub mod commands;
mod error;

pub use commands::CommandKind;
pub use error::GatewayError;

use async_trait::async_trait;

use crate::vehicle::{Location, Vehicle, VehicleStatus};

/// Command dispatch and status retrieval for remote vehicles
#[async_trait]
pub trait VehicleGateway: Send + Sync {
    /// Fetch the current status of a vehicle
    async fn fetch_status(&self, vehicle: &Vehicle) -> Result<VehicleStatus, GatewayError>;

    /// Send a command to a vehicle
    async fn send_command(&self, kind: CommandKind, vehicle: &Vehicle)
        -> Result<(), GatewayError>;

    /// Persist vehicle details, returning the stored vehicle
    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, GatewayError>;
}

/// Live device position, when the host can provide one
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current position, or `None` when unavailable
    async fn current_location(&self) -> Option<Location>;
}

/// Outside temperature lookup keyed on position
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    /// Outside air temperature (°F) at a location
    async fn outside_temperature_f(&self, location: Location) -> Result<f64, GatewayError>;
}
