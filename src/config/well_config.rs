//! Well Test Configuration - fixed well/fluid properties for one build-up
//!
//! Every physical quantity is required and has no built-in default; a
//! missing key is a load error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::physics_engine::ReservoirProperties;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "WELLTEST_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "well_test.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one build-up analysis session.
///
/// Load with `WellTestConfig::load()` which searches:
/// 1. an explicit path (e.g. `--config`)
/// 2. `$WELLTEST_CONFIG`
/// 3. `./well_test.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellTestConfig {
    /// Well identification
    #[serde(default)]
    pub well: WellInfo,

    /// Flow period preceding shut-in
    pub flow_period: FlowPeriodConfig,

    /// Produced fluid properties
    pub fluid: FluidConfig,

    /// Rock / completion properties
    pub reservoir: ReservoirConfig,
}

impl WellTestConfig {
    /// Load configuration using the standard search order.
    ///
    /// An explicit path is authoritative: if it fails, so does the load. A
    /// broken `$WELLTEST_CONFIG` falls back to the local file with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            info!(path = %path.display(), well = %config.well.name, "Loaded well test config");
            return Ok(config);
        }

        let mut searched = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), well = %config.well.name, "Loaded well test config from {CONFIG_ENV_VAR}");
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
            searched.push(p);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!(well = %config.well.name, "Loaded well test config from ./{LOCAL_CONFIG_FILE}");
            return Ok(config);
        }
        searched.push(local);

        Err(ConfigError::NotFound(searched))
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;

        let (_, range_warnings) = super::validation::validate_physical_ranges(&config);
        for w in range_warnings {
            warn!("{}", w);
        }
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Well test config saved");
        Ok(())
    }

    /// Check every physical value.
    ///
    /// Rules:
    /// - All quantities finite and strictly positive
    /// - Porosity at most 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let positives = [
            ("flow_period.producing_time_hours", self.flow_period.producing_time_hours),
            ("fluid.flow_rate_bbl_day", self.fluid.flow_rate_bbl_day),
            ("fluid.formation_volume_factor", self.fluid.formation_volume_factor),
            ("fluid.viscosity_cp", self.fluid.viscosity_cp),
            ("fluid.total_compressibility_per_psi", self.fluid.total_compressibility_per_psi),
            ("reservoir.porosity", self.reservoir.porosity),
            ("reservoir.wellbore_radius_ft", self.reservoir.wellbore_radius_ft),
            ("reservoir.thickness_ft", self.reservoir.thickness_ft),
        ];
        for (name, value) in positives {
            Self::check_positive(value, name, &mut errors);
        }

        let (range_errors, _) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so check finiteness first
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        } else if value <= 0.0 {
            errors.push(format!("{name}: value must be > 0 (got {value})"));
        }
    }

    /// Constants handed to the reservoir parameter calculator.
    pub const fn properties(&self) -> ReservoirProperties {
        ReservoirProperties {
            producing_time: self.flow_period.producing_time_hours,
            flow_rate: self.fluid.flow_rate_bbl_day,
            formation_volume_factor: self.fluid.formation_volume_factor,
            viscosity: self.fluid.viscosity_cp,
            porosity: self.reservoir.porosity,
            total_compressibility: self.fluid.total_compressibility_per_psi,
            wellbore_radius: self.reservoir.wellbore_radius_ft,
            thickness: self.reservoir.thickness_ft,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({path}): {err}", path = .0.display(), err = .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({path}): {err}", path = .0.display(), err = .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),

    #[error("No well test config found (searched: {})", display_paths(.0))]
    NotFound(Vec<PathBuf>),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Sections
// ============================================================================

/// Identification metadata; appears in logs only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellInfo {
    /// Well name / identifier
    #[serde(default = "default_well_name")]
    pub name: String,

    /// Field name
    #[serde(default)]
    pub field: String,
}

fn default_well_name() -> String {
    "UNNAMED".to_string()
}

impl Default for WellInfo {
    fn default() -> Self {
        Self {
            name: default_well_name(),
            field: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPeriodConfig {
    /// tp: producing time before shut-in (hours)
    pub producing_time_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Qo: stabilized oil rate before shut-in (bbl/day)
    pub flow_rate_bbl_day: f64,
    /// Bo: oil formation volume factor (rb/STB)
    pub formation_volume_factor: f64,
    /// μo: oil viscosity (cp)
    pub viscosity_cp: f64,
    /// Ct: total system compressibility (1/psi)
    pub total_compressibility_per_psi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservoirConfig {
    /// φ: porosity (fraction)
    pub porosity: f64,
    /// rw: wellbore radius (ft)
    pub wellbore_radius_ft: f64,
    /// h: net pay thickness (ft)
    pub thickness_ft: f64,
}
