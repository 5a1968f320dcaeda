//! Orchestrator configuration
//!
//! Tunables for the command orchestrator, stored as JSON. Every field has a
//! default, so a partial (or empty) file is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Command orchestrator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Glow plugs run when the cached outside temperature is at or below this (°F)
    #[serde(default = "default_glow_plug_threshold_f")]
    pub glow_plug_threshold_f: f64,

    /// How long Success/Error stays visible before resetting to Idle
    #[serde(default = "default_result_display_secs")]
    pub result_display_secs: u64,

    /// Number of command records kept in history
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Length of one pre-warm countdown tick
    #[serde(default = "default_countdown_tick_ms")]
    pub countdown_tick_ms: u64,
}

fn default_glow_plug_threshold_f() -> f64 {
    50.0
}

fn default_result_display_secs() -> u64 {
    2
}

fn default_history_capacity() -> usize {
    5
}

fn default_countdown_tick_ms() -> u64 {
    1000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            glow_plug_threshold_f: default_glow_plug_threshold_f(),
            result_display_secs: default_result_display_secs(),
            history_capacity: default_history_capacity(),
            countdown_tick_ms: default_countdown_tick_ms(),
        }
    }
}

impl OrchestratorConfig {
    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: OrchestratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the orchestrator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.countdown_tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "countdown_tick_ms must be greater than 0".to_string(),
            ));
        }
        if !self.glow_plug_threshold_f.is_finite() {
            return Err(ConfigError::Invalid(
                "glow_plug_threshold_f must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Result display delay
    pub fn result_display(&self) -> Duration {
        Duration::from_secs(self.result_display_secs)
    }

    /// Countdown tick length
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.glow_plug_threshold_f, 50.0);
        assert_eq!(config.result_display(), Duration::from_secs(2));
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.countdown_tick(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{ "glow_plug_threshold_f": 40.0 }"#).unwrap();
        assert_eq!(
            config,
            OrchestratorConfig {
                glow_plug_threshold_f: 40.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orchestrator.json");
        let config = OrchestratorConfig {
            history_capacity: 10,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(OrchestratorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orchestrator.json");

        fs::write(&path, r#"{ "history_capacity": 0 }"#).unwrap();
        assert!(matches!(
            OrchestratorConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            OrchestratorConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));

        assert!(matches!(
            OrchestratorConfig::load(dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
