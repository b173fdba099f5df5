// ─────────────────────────────────────────────────────────────────────
// SCPN Nucnet — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! JSON-backed evolution settings consumed by zones and the step controller.

use crate::error::{NucnetError, NucnetResult};
use serde::{Deserialize, Serialize};

/// Settings for a network evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Derive reverse rates from forward rates via detailed balance (default: true)
    #[serde(default = "default_detailed_balance")]
    pub detailed_balance: bool,
    /// First trial timestep in seconds (default: 1e-10)
    #[serde(default = "default_initial_dt")]
    pub initial_dt: f64,
    #[serde(default)]
    pub timestep: TimestepConfig,
}

/// Step-limiter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestepConfig {
    /// Maximum fractional growth of dt per step (default: 0.15)
    #[serde(default = "default_reg_t")]
    pub reg_t: f64,
    /// Maximum fractional change of any tracked abundance per step (default: 0.15)
    #[serde(default = "default_reg_y")]
    pub reg_y: f64,
    /// Abundances at or below this are ignored by the limiter (default: 1e-10)
    #[serde(default = "default_y_min")]
    pub y_min: f64,
}

fn default_detailed_balance() -> bool {
    true
}
fn default_initial_dt() -> f64 {
    1.0e-10
}
fn default_reg_t() -> f64 {
    0.15
}
fn default_reg_y() -> f64 {
    0.15
}
fn default_y_min() -> f64 {
    1.0e-10
}

impl Default for TimestepConfig {
    fn default() -> Self {
        TimestepConfig {
            reg_t: default_reg_t(),
            reg_y: default_reg_y(),
            y_min: default_y_min(),
        }
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        EvolutionConfig {
            detailed_balance: default_detailed_balance(),
            initial_dt: default_initial_dt(),
            timestep: TimestepConfig::default(),
        }
    }
}

impl TimestepConfig {
    pub fn validate(&self) -> NucnetResult<()> {
        for (name, value) in [
            ("reg_t", self.reg_t),
            ("reg_y", self.reg_y),
            ("y_min", self.y_min),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NucnetError::ConfigError(format!(
                    "timestep.{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl EvolutionConfig {
    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> NucnetResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> NucnetResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NucnetResult<()> {
        if !self.initial_dt.is_finite() || self.initial_dt <= 0.0 {
            return Err(NucnetError::ConfigError(format!(
                "initial_dt must be finite and > 0, got {}",
                self.initial_dt
            )));
        }
        self.timestep.validate()
    }
}
