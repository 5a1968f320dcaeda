//! Glow-plug diagnostics
//!
//! Point-in-time record of the pre-warm decision taken for a diesel start.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vehicle::{EngineOption, Location, VehicleStatus};

/// Outside temperature assumed when no status has been fetched yet (°F)
pub const UNKNOWN_OUTSIDE_TEMP_F: f64 = 0.0;

/// Pre-warm runs at or below the threshold
pub fn glow_plugs_required(outside_temp_f: f64, threshold_f: f64) -> bool {
    outside_temp_f <= threshold_f
}

/// Pre-warm decision for one start attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlowPlugDiagnostics {
    /// When the decision was taken
    pub timestamp: DateTime<Utc>,
    /// Cached outside temperature used for the decision (°F)
    pub outside_temp_f: f64,
    /// Cached vehicle location, if a status was available
    pub location: Option<Location>,
    /// Threshold the temperature was compared against (°F)
    pub threshold_f: f64,
    /// Engine that was resolved for the vehicle
    pub engine_name: String,
    /// Whether the glow-plug cycle runs before dispatch
    pub should_run_glow_plugs: bool,
    /// Countdown seconds left; 0 when no countdown is running
    pub remaining_seconds: u32,
}

impl GlowPlugDiagnostics {
    /// Take the pre-warm decision from the cached status
    pub fn evaluate(
        engine: &EngineOption,
        cached: Option<&VehicleStatus>,
        threshold_f: f64,
    ) -> Self {
        let outside_temp_f = cached
            .map(|s| s.outside_temp_f)
            .unwrap_or(UNKNOWN_OUTSIDE_TEMP_F);
        let should_run_glow_plugs = glow_plugs_required(outside_temp_f, threshold_f);
        Self {
            timestamp: Utc::now(),
            outside_temp_f,
            location: cached.map(|s| s.location),
            threshold_f,
            engine_name: engine.name.to_string(),
            should_run_glow_plugs,
            remaining_seconds: if should_run_glow_plugs {
                engine.glow_plug_seconds
            } else {
                0
            },
        }
    }
}
