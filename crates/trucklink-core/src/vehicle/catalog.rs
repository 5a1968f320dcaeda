//! Engine catalog
//!
//! Fixed table of supported engines. Every lookup resolves to a defined
//! engine; absence falls back within the catalog instead of propagating.

use serde::Serialize;

use super::{FuelType, Vehicle};

/// A selectable engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineOption {
    /// Stable identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Fuel kind
    pub fuel_type: FuelType,
    /// Pre-warm duration in whole seconds (0 for gas engines)
    pub glow_plug_seconds: u32,
}

impl EngineOption {
    /// Whether this engine is glow-plug equipped
    pub fn needs_prewarm(&self) -> bool {
        EngineCatalog::needs_prewarm(self)
    }
}

/// Catalog order matters: the first diesel entry is the diesel fallback and
/// the first entry overall is the global fallback.
static ENGINES: [EngineOption; 5] = [
    EngineOption {
        id: "gas-6.2-v8",
        name: "6.2L V8 Gas",
        fuel_type: FuelType::Gas,
        glow_plug_seconds: 0,
    },
    EngineOption {
        id: "gas-3.5-ecoboost",
        name: "3.5L EcoBoost V6",
        fuel_type: FuelType::Gas,
        glow_plug_seconds: 0,
    },
    EngineOption {
        id: "diesel-6.7-powerstroke",
        name: "6.7L Power Stroke V8 Turbo Diesel",
        fuel_type: FuelType::Diesel,
        glow_plug_seconds: 15,
    },
    EngineOption {
        id: "diesel-6.6-duramax",
        name: "6.6L Duramax V8 Turbo Diesel",
        fuel_type: FuelType::Diesel,
        glow_plug_seconds: 10,
    },
    EngineOption {
        id: "diesel-3.0-powerstroke",
        name: "3.0L Power Stroke V6 Turbo Diesel",
        fuel_type: FuelType::Diesel,
        glow_plug_seconds: 6,
    },
];

/// Stateless engine lookup
pub struct EngineCatalog;

impl EngineCatalog {
    /// All catalog entries in catalog order
    pub fn all() -> &'static [EngineOption] {
        &ENGINES
    }

    /// Entries for one fuel kind
    pub fn for_fuel(fuel: FuelType) -> impl Iterator<Item = &'static EngineOption> {
        ENGINES.iter().filter(move |e| e.fuel_type == fuel)
    }

    /// Look up an engine by id
    pub fn by_id(id: &str) -> Option<&'static EngineOption> {
        ENGINES.iter().find(|e| e.id == id)
    }

    /// First engine of the given fuel kind, or the first catalog entry
    pub fn fallback_for(fuel: FuelType) -> &'static EngineOption {
        Self::for_fuel(fuel).next().unwrap_or(&ENGINES[0])
    }

    /// Global fallback engine
    pub fn default_engine() -> &'static EngineOption {
        &ENGINES[0]
    }

    /// Diesel engines need a glow-plug cycle before starting
    pub fn needs_prewarm(engine: &EngineOption) -> bool {
        engine.fuel_type == FuelType::Diesel
    }

    /// Effective engine of a vehicle.
    ///
    /// Order: the configured engine, then the fallback for the configured fuel
    /// kind, then the global fallback.
    pub fn resolve_for(vehicle: &Vehicle) -> &'static EngineOption {
        if let Some(engine) = vehicle.engine_id().and_then(Self::by_id) {
            return engine;
        }
        match vehicle.fuel_type() {
            Some(fuel) => Self::fallback_for(fuel),
            None => Self::default_engine(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prewarm_implies_diesel() {
        for engine in EngineCatalog::all() {
            if engine.glow_plug_seconds > 0 {
                assert_eq!(engine.fuel_type, FuelType::Diesel, "{}", engine.id);
            }
            assert_eq!(engine.needs_prewarm(), engine.fuel_type == FuelType::Diesel);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let all = EngineCatalog::all();
        for (i, a) in all.iter().enumerate() {
            assert!(all[i + 1..].iter().all(|b| b.id != a.id));
        }
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(
            EngineCatalog::fallback_for(FuelType::Diesel).id,
            "diesel-6.7-powerstroke"
        );
        assert_eq!(EngineCatalog::fallback_for(FuelType::Gas).id, "gas-6.2-v8");
        assert_eq!(EngineCatalog::default_engine().id, "gas-6.2-v8");
        assert!(EngineCatalog::by_id("rotary-1.3").is_none());
    }

    #[test]
    fn test_resolve_for_vehicle() {
        let bare = Vehicle::new("Ram", "2500", 2018);
        assert_eq!(EngineCatalog::resolve_for(&bare).id, "gas-6.2-v8");

        let diesel = Vehicle::new("Ram", "2500", 2018).with_fuel_type(FuelType::Diesel);
        assert_eq!(
            EngineCatalog::resolve_for(&diesel).id,
            "diesel-6.7-powerstroke"
        );

        let engine = EngineCatalog::by_id("diesel-6.6-duramax").unwrap();
        let configured = Vehicle::new("GMC", "Sierra HD", 2022).with_engine(engine);
        assert_eq!(EngineCatalog::resolve_for(&configured), engine);
    }
}
