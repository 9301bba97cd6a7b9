//! Calculator configuration module.
//!
//! Handles loading, validating, and merging `sunny16.toml`. Stock defaults are
//! the Sunny 16 reference scene; a user file overrides only what it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! increment = "full"        # "full" or "third"
//!
//! [defaults]
//! ev = 15                   # Light condition (-6 to 21)
//! iso = "100"
//! aperture = "f/16"
//! shutter = "1/125"
//! ```
//!
//! Parameter defaults are written as markings, the same way they appear on a
//! camera, and resolved to exact grid values at use. When the active increment
//! is `full` and a configured default is a third stop, the stock default for
//! that parameter is used instead.
//!
//! Unknown keys are rejected to catch typos early.

use crate::light::EV_RANGE;
use crate::stops::{Stop, generate_grid};
use crate::types::{ParameterKind, StopIncrement};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "sunny16.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Calculator configuration loaded from `sunny16.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Grid density used when the command line does not choose one.
    pub increment: StopIncrement,
    /// Starting values for each parameter.
    pub defaults: DefaultsConfig,
}

/// Starting values, used for any parameter the command line leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Light condition in whole EV.
    pub ev: i32,
    pub iso: String,
    pub aperture: String,
    pub shutter: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ev: 15,
            iso: "100".to_string(),
            aperture: "f/16".to_string(),
            shutter: "1/125".to_string(),
        }
    }
}

impl DefaultsConfig {
    /// Marking configured for `kind`.
    pub fn label(&self, kind: ParameterKind) -> &str {
        match kind {
            ParameterKind::Iso => &self.iso,
            ParameterKind::Aperture => &self.aperture,
            ParameterKind::Shutter => &self.shutter,
        }
    }
}

impl CalculatorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !EV_RANGE.contains(&self.defaults.ev) {
            return Err(ConfigError::Validation(format!(
                "defaults.ev must be {}-{}, got {}",
                EV_RANGE.start(),
                EV_RANGE.end(),
                self.defaults.ev
            )));
        }
        for kind in ParameterKind::ALL {
            let label = self.defaults.label(kind);
            if generate_grid(kind, StopIncrement::Third)
                .find_label(label)
                .is_none()
            {
                return Err(ConfigError::Validation(format!(
                    "defaults.{} = \"{label}\" is not a standard {kind}",
                    config_key(kind)
                )));
            }
        }
        Ok(())
    }

    /// Resolve the default for `kind` on the grid for `increment`.
    ///
    /// Falls back to the stock default when the configured marking is not on
    /// that grid (a third stop under `full` increments).
    pub fn default_stop(
        &self,
        kind: ParameterKind,
        increment: StopIncrement,
    ) -> Result<Stop, ConfigError> {
        let grid = generate_grid(kind, increment);
        let label = self.defaults.label(kind);
        if let Some(stop) = grid.find_label(label) {
            return Ok(stop);
        }
        let stock = DefaultsConfig::default();
        let fallback = stock.label(kind);
        tracing::debug!(
            %kind,
            configured = label,
            fallback,
            "configured default is not a {increment}-stop value"
        );
        grid.find_label(fallback).ok_or_else(|| {
            ConfigError::Validation(format!(
                "defaults.{} = \"{label}\" is not a {increment}-stop {kind}",
                config_key(kind)
            ))
        })
    }
}

fn config_key(kind: ParameterKind) -> &'static str {
    match kind {
        ParameterKind::Iso => "iso",
        ParameterKind::Aperture => "aperture",
        ParameterKind::Shutter => "shutter",
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CalculatorConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `sunny16.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CalculatorConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CalculatorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `sunny16.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<CalculatorConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `sunny16.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sunny 16 Calculator Configuration
# =================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# Stop increment for all three parameter grids: "full" or "third".
increment = "full"

# ---------------------------------------------------------------------------
# Starting values
# ---------------------------------------------------------------------------
# Used for any parameter not given on the command line. Write them the way
# the camera marks them. Under "full" increments, a third-stop value here
# falls back to the Sunny 16 default for that parameter.
[defaults]
# Light condition in whole EV, -6 (starlight) to 21. 15 is bright sun.
ev = 15

iso = "100"
aperture = "f/16"

# Sub-second speeds as 1/x, longer exposures in seconds (e.g. "2\"").
shutter = "1/125"
"##
}
