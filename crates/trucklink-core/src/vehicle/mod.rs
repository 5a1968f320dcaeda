//! Vehicle Model
//!
//! Vehicles, their fuel/engine configuration and the status snapshot reported
//! by the remote gateway.

pub mod catalog;

pub use catalog::{EngineCatalog, EngineOption};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Fuel kind of an engine or vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    /// Spark-ignition gasoline engine
    Gas,
    /// Compression-ignition diesel engine (glow plugs)
    Diesel,
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelType::Gas => f.pad("gas"),
            FuelType::Diesel => f.pad("diesel"),
        }
    }
}

/// A registered vehicle
///
/// Deserialized vehicles go through the same engine selection as
/// [`Vehicle::select_engine`], so a stored engine always wins over a stored
/// fuel type and unknown engine ids are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VehicleRecord")]
pub struct Vehicle {
    /// Stable vehicle identity
    pub id: Uuid,
    /// Manufacturer
    pub make: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: u16,
    /// User-chosen nickname (may be empty)
    #[serde(default)]
    pub nickname: String,
    /// Fuel kind, if known
    #[serde(default)]
    fuel_type: Option<FuelType>,
    /// Selected engine id from the catalog, if any
    #[serde(default)]
    engine_id: Option<String>,
}

impl Vehicle {
    /// Create a vehicle with a fresh identity and no engine configuration
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: u16) -> Self {
        Self {
            id: Uuid::new_v4(),
            make: make.into(),
            model: model.into(),
            year,
            nickname: String::new(),
            fuel_type: None,
            engine_id: None,
        }
    }

    /// Builder-style nickname
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// Builder-style engine selection (also sets the fuel type)
    pub fn with_engine(mut self, engine: &EngineOption) -> Self {
        self.select_engine(engine);
        self
    }

    /// Builder-style fuel type, leaving the engine unset
    pub fn with_fuel_type(mut self, fuel: FuelType) -> Self {
        self.set_fuel_type(Some(fuel));
        self
    }

    /// Name shown to the user: nickname if set, otherwise "year make model"
    pub fn display_name(&self) -> String {
        if self.nickname.trim().is_empty() {
            format!("{} {} {}", self.year, self.make, self.model)
        } else {
            self.nickname.clone()
        }
    }

    /// Configured fuel type
    pub fn fuel_type(&self) -> Option<FuelType> {
        self.fuel_type
    }

    /// Configured engine id
    pub fn engine_id(&self) -> Option<&str> {
        self.engine_id.as_deref()
    }

    /// Select an engine. The fuel type always follows the engine.
    pub fn select_engine(&mut self, engine: &EngineOption) {
        self.engine_id = Some(engine.id.to_string());
        self.fuel_type = Some(engine.fuel_type);
    }

    /// Change the fuel type.
    ///
    /// A selected engine of a different fuel kind no longer agrees with the
    /// vehicle and is dropped.
    pub fn set_fuel_type(&mut self, fuel: Option<FuelType>) {
        self.fuel_type = fuel;
        let engine_fuel = self
            .engine_id
            .as_deref()
            .and_then(EngineCatalog::by_id)
            .map(|e| e.fuel_type);
        if engine_fuel.is_some() && engine_fuel != fuel {
            self.engine_id = None;
        }
    }

    /// Clear the engine selection, keeping the fuel type
    pub fn clear_engine(&mut self) {
        self.engine_id = None;
    }
}

/// Stored form of a [`Vehicle`], before engine/fuel normalization
#[derive(Deserialize)]
struct VehicleRecord {
    id: Uuid,
    make: String,
    model: String,
    year: u16,
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    fuel_type: Option<FuelType>,
    #[serde(default)]
    engine_id: Option<String>,
}

impl From<VehicleRecord> for Vehicle {
    fn from(record: VehicleRecord) -> Self {
        let mut vehicle = Vehicle {
            id: record.id,
            make: record.make,
            model: record.model,
            year: record.year,
            nickname: record.nickname,
            fuel_type: record.fuel_type,
            engine_id: None,
        };
        match record.engine_id.as_deref().map(|id| (id, EngineCatalog::by_id(id))) {
            Some((_, Some(engine))) => vehicle.select_engine(engine),
            Some((id, None)) => debug!(vehicle = %vehicle.id, engine = id, "dropping unknown engine"),
            None => {}
        }
        vehicle
    }
}

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Location {
    /// Create a location
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Last-known vehicle status snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatus {
    /// Doors locked
    pub is_locked: bool,
    /// Engine running
    pub engine_running: bool,
    /// Fuel level as a fraction in [0, 1]
    pub fuel_level: f64,
    /// Battery voltage
    pub battery_voltage: f64,
    /// Outside air temperature (°F)
    pub outside_temp_f: f64,
    /// Cabin temperature (°F), if the vehicle reports one
    #[serde(default)]
    pub cabin_temp_f: Option<f64>,
    /// Vehicle position
    pub location: Location,
}

impl VehicleStatus {
    /// Clamp the fuel level into [0, 1]
    pub fn normalized(mut self) -> Self {
        self.fuel_level = if self.fuel_level.is_nan() {
            0.0
        } else {
            self.fuel_level.clamp(0.0, 1.0)
        };
        self
    }

    /// Fuel level in percent
    pub fn fuel_percent(&self) -> f64 {
        self.fuel_level * 100.0
    }
}

impl Default for VehicleStatus {
    fn default() -> Self {
        Self {
            is_locked: true,
            engine_running: false,
            fuel_level: 0.0,
            battery_voltage: 12.6,
            outside_temp_f: 0.0,
            cabin_temp_f: None,
            location: Location::default(),
        }
    }
}
