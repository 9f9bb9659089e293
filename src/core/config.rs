//! Engine configuration with documented constants
//!
//! Tolerances and guards are collected here with explanations of their
//! purpose. Values can be overridden from a TOML file.

use crate::core::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one resolution/execution engine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tolerance for solid continuity checks (millimetres)
    ///
    /// A chained feature's profile may exceed its parent face's boundary
    /// radius by at most this amount before the resolver reports a
    /// continuity violation. Kernel modellers treat coincidence within
    /// ~1e-3 mm as exact, so the default matches that.
    pub continuity_tolerance: f64,

    /// Upper bound on the number of steps in a single plan
    ///
    /// Compound intents nest, so a malformed intent could otherwise expand
    /// into an unbounded plan. Plans longer than this fail at build time.
    pub max_plan_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            continuity_tolerance: 1e-3,
            max_plan_steps: 64,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file, falling back to defaults for
    /// any key the file omits
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        config
            .validate()
            .map_err(EngineError::Config)?;
        Ok(config)
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.continuity_tolerance.is_finite() || self.continuity_tolerance <= 0.0 {
            return Err(format!(
                "continuity_tolerance ({}) must be finite and positive",
                self.continuity_tolerance
            ));
        }

        if self.max_plan_steps == 0 {
            return Err("max_plan_steps must be at least 1".into());
        }

        Ok(())
    }
}
