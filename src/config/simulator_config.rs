//! Simulator Configuration - engine constants as operator-tunable TOML values
//!
//! Each struct implements `Default` with the engine's standard constants,
//! so a missing config file yields the standard engine behaviour.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::types::{ConveyanceParams, ConveyanceType, WeightUnit};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the live-operation simulator.
///
/// Load with `SimulatorConfig::load()` which searches:
/// 1. `$WELLTEGRA_CONFIG` env var
/// 2. `./welltegra.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Clock and buffer settings
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Restriction slow-down and tension spike tuning
    #[serde(default)]
    pub restrictions: RestrictionSettings,

    /// Per-conveyance physical parameters
    #[serde(default)]
    pub conveyance: ConveyanceConfig,
}

impl SimulatorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELLTEGRA_CONFIG` environment variable
    /// 2. `./welltegra.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(
                            path = %p.display(),
                            "Loaded simulator config from {}",
                            defaults::CONFIG_ENV_VAR
                        );
                        return config;
                    }
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "Failed to load config from {}, falling back",
                            defaults::CONFIG_ENV_VAR
                        );
                    }
                }
            } else {
                warn!(
                    path = %path,
                    "{} points to non-existent file, falling back",
                    defaults::CONFIG_ENV_VAR
                );
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded simulator config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        "Failed to load ./{}, using defaults",
                        defaults::CONFIG_FILE_NAME
                    );
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE_NAME);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        // Unknown keys only warn; serde ignores them
        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
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
        info!(path = %path.display(), "Simulator config saved");
        Ok(())
    }

    /// Physical parameters for a conveyance type.
    pub const fn conveyance_params(&self, conveyance: ConveyanceType) -> ConveyanceParams {
        self.conveyance.params_for(conveyance)
    }

    /// Wall-clock period between ticks, `None` when pacing is disabled.
    pub fn tick_period(&self) -> Option<Duration> {
        let s = &self.simulation;
        if s.speed_multiplier <= 0.0 {
            return None;
        }
        match Duration::try_from_secs_f64(s.tick_seconds / s.speed_multiplier) {
            Ok(period) => Some(period),
            Err(e) => {
                warn!(
                    tick_seconds = s.tick_seconds,
                    speed_multiplier = s.speed_multiplier,
                    error = %e,
                    "Tick period not representable, running unpaced"
                );
                None
            }
        }
    }

    /// Validate all settings for internal consistency.
    ///
    /// Rules:
    /// - Every number must be finite
    /// - Periods, speeds and radii must be positive
    /// - A non-zero speed multiplier must give a representable tick period
    /// - The contact band must sit inside the slow-down band
    /// - The minimum speed fraction must be in (0, 1]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let s = &self.simulation;
        if !(s.tick_seconds.is_finite() && s.tick_seconds > 0.0) {
            errors.push(format!(
                "simulation.tick_seconds must be > 0 (got {})",
                s.tick_seconds
            ));
        }
        if !(s.speed_multiplier.is_finite() && s.speed_multiplier >= 0.0) {
            errors.push(format!(
                "simulation.speed_multiplier must be >= 0 (got {})",
                s.speed_multiplier
            ));
        }
        if s.tick_seconds.is_finite()
            && s.speed_multiplier.is_finite()
            && s.speed_multiplier > 0.0
            && Duration::try_from_secs_f64(s.tick_seconds / s.speed_multiplier).is_err()
        {
            errors.push(format!(
                "simulation.speed_multiplier {} gives an unrepresentable tick period",
                s.speed_multiplier
            ));
        }
        if s.trace_capacity == 0 {
            errors.push("simulation.trace_capacity must be > 0".to_string());
        }
        if s.max_ticks == 0 {
            errors.push("simulation.max_ticks must be > 0".to_string());
        }

        let r = &self.restrictions;
        Self::check_positive(
            r.slowdown_radius_ft,
            "restrictions.slowdown_radius_ft",
            &mut errors,
        );
        Self::check_positive(
            r.contact_radius_ft,
            "restrictions.contact_radius_ft",
            &mut errors,
        );
        if r.contact_radius_ft > r.slowdown_radius_ft {
            errors.push(format!(
                "restrictions.contact_radius_ft ({:.1}) must be <= slowdown_radius_ft ({:.1})",
                r.contact_radius_ft, r.slowdown_radius_ft
            ));
        }
        if !(r.min_speed_fraction > 0.0 && r.min_speed_fraction <= 1.0) {
            errors.push(format!(
                "restrictions.min_speed_fraction must be in (0, 1] (got {})",
                r.min_speed_fraction
            ));
        }
        if !(r.tension_spike_factor.is_finite() && r.tension_spike_factor >= 0.0) {
            errors.push(format!(
                "restrictions.tension_spike_factor must be >= 0 (got {})",
                r.tension_spike_factor
            ));
        }

        for kind in ConveyanceType::ALL {
            let p = self.conveyance.params_for(kind);
            let section = ConveyanceConfig::section_name(kind);
            if !(p.weight_per_foot.is_finite() && p.weight_per_foot >= 0.0) {
                errors.push(format!(
                    "conveyance.{section}.weight_per_foot must be >= 0 (got {})",
                    p.weight_per_foot
                ));
            }
            Self::check_positive(
                p.max_speed_ft_min,
                &format!("conveyance.{section}.max_speed_ft_min"),
                &mut errors,
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, so test finiteness first
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name} must be a finite number > 0 (got {value})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Simulation Settings
// ============================================================================

/// Clock pacing and buffer sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Simulated seconds per tick
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,

    /// Wall-clock compression (0 = run without pacing)
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,

    /// Maximum (depth, weight) samples kept for charting
    #[serde(default = "default_trace_capacity")]
    pub trace_capacity: usize,

    /// Tick budget for a single job
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

const fn default_tick_seconds() -> f64 {
    defaults::TICK_SECONDS
}
const fn default_speed_multiplier() -> f64 {
    defaults::SPEED_MULTIPLIER
}
const fn default_trace_capacity() -> usize {
    defaults::TRACE_CAPACITY
}
const fn default_max_ticks() -> u64 {
    defaults::MAX_TICKS
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
            speed_multiplier: default_speed_multiplier(),
            trace_capacity: default_trace_capacity(),
            max_ticks: default_max_ticks(),
        }
    }
}

// ============================================================================
// Restriction Settings
// ============================================================================

/// How often a restriction encounter is written to the log and lessons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EncounterPolicy {
    /// First contact with each restriction per job
    #[default]
    Once,
    /// Every new entry into the restriction's contact band
    PerCrossing,
    /// Every tick spent inside the contact band
    EveryTick,
}

/// Restriction proximity tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestrictionSettings {
    #[serde(default = "default_slowdown_radius")]
    pub slowdown_radius_ft: f64,

    #[serde(default = "default_contact_radius")]
    pub contact_radius_ft: f64,

    #[serde(default = "default_min_speed_fraction")]
    pub min_speed_fraction: f64,

    #[serde(default = "default_spike_factor")]
    pub tension_spike_factor: f64,

    #[serde(default)]
    pub encounter_policy: EncounterPolicy,
}

const fn default_slowdown_radius() -> f64 {
    defaults::SLOWDOWN_RADIUS_FT
}
const fn default_contact_radius() -> f64 {
    defaults::CONTACT_RADIUS_FT
}
const fn default_min_speed_fraction() -> f64 {
    defaults::MIN_SPEED_FRACTION
}
const fn default_spike_factor() -> f64 {
    defaults::TENSION_SPIKE_FACTOR
}

impl Default for RestrictionSettings {
    fn default() -> Self {
        Self {
            slowdown_radius_ft: default_slowdown_radius(),
            contact_radius_ft: default_contact_radius(),
            min_speed_fraction: default_min_speed_fraction(),
            tension_spike_factor: default_spike_factor(),
            encounter_policy: EncounterPolicy::default(),
        }
    }
}

// ============================================================================
// Conveyance Config
// ============================================================================

/// Physical parameters per conveyance type. Fields missing from a section
/// keep that conveyance's built-in value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConveyanceConfig {
    #[serde(default = "default_slickline", deserialize_with = "slickline_section")]
    pub slickline: ConveyanceParams,

    #[serde(default = "default_e_line", deserialize_with = "e_line_section")]
    pub e_line: ConveyanceParams,

    #[serde(default = "default_coiled_tubing", deserialize_with = "coiled_tubing_section")]
    pub coiled_tubing: ConveyanceParams,
}

const fn default_slickline() -> ConveyanceParams {
    ConveyanceParams::for_type(ConveyanceType::Slickline)
}
const fn default_e_line() -> ConveyanceParams {
    ConveyanceParams::for_type(ConveyanceType::ELine)
}
const fn default_coiled_tubing() -> ConveyanceParams {
    ConveyanceParams::for_type(ConveyanceType::CoiledTubing)
}

/// One `[conveyance.*]` section as written by the operator.
#[derive(Debug, Default, Deserialize)]
struct ConveyanceOverride {
    weight_per_foot: Option<f64>,
    max_speed_ft_min: Option<f64>,
    unit: Option<WeightUnit>,
}

impl ConveyanceOverride {
    fn merge_over(self, base: ConveyanceParams) -> ConveyanceParams {
        ConveyanceParams {
            weight_per_foot: self.weight_per_foot.unwrap_or(base.weight_per_foot),
            max_speed_ft_min: self.max_speed_ft_min.unwrap_or(base.max_speed_ft_min),
            unit: self.unit.unwrap_or(base.unit),
        }
    }
}

fn slickline_section<'de, D: Deserializer<'de>>(d: D) -> Result<ConveyanceParams, D::Error> {
    ConveyanceOverride::deserialize(d).map(|o| o.merge_over(default_slickline()))
}
fn e_line_section<'de, D: Deserializer<'de>>(d: D) -> Result<ConveyanceParams, D::Error> {
    ConveyanceOverride::deserialize(d).map(|o| o.merge_over(default_e_line()))
}
fn coiled_tubing_section<'de, D: Deserializer<'de>>(d: D) -> Result<ConveyanceParams, D::Error> {
    ConveyanceOverride::deserialize(d).map(|o| o.merge_over(default_coiled_tubing()))
}

impl Default for ConveyanceConfig {
    fn default() -> Self {
        Self {
            slickline: default_slickline(),
            e_line: default_e_line(),
            coiled_tubing: default_coiled_tubing(),
        }
    }
}

impl ConveyanceConfig {
    pub const fn params_for(&self, conveyance: ConveyanceType) -> ConveyanceParams {
        match conveyance {
            ConveyanceType::Slickline => self.slickline,
            ConveyanceType::ELine => self.e_line,
            ConveyanceType::CoiledTubing => self.coiled_tubing,
        }
    }

    /// TOML section name for a conveyance type.
    pub const fn section_name(conveyance: ConveyanceType) -> &'static str {
        match conveyance {
            ConveyanceType::Slickline => "slickline",
            ConveyanceType::ELine => "e_line",
            ConveyanceType::CoiledTubing => "coiled_tubing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let config = SimulatorConfig::default();
        assert!((config.simulation.tick_seconds - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.simulation.trace_capacity, 500);
        assert!((config.restrictions.slowdown_radius_ft - 200.0).abs() < f64::EPSILON);
        assert!((config.restrictions.contact_radius_ft - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.restrictions.encounter_policy, EncounterPolicy::Once);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = SimulatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulatorConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = SimulatorConfig::from_toml_str(
            r#"
[restrictions]
encounter_policy = "every_tick"
"#,
        )
        .unwrap();
        assert_eq!(config.restrictions.encounter_policy, EncounterPolicy::EveryTick);
        assert!((config.restrictions.min_speed_fraction - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.conveyance, ConveyanceConfig::default());
    }

    #[test]
    fn test_conveyance_override() {
        let config = SimulatorConfig::from_toml_str(
            r#"
[conveyance.e_line]
weight_per_foot = 0.2
max_speed_ft_min = 150.0
unit = "klbf"
"#,
        )
        .unwrap();
        let p = config.conveyance_params(ConveyanceType::ELine);
        assert!((p.max_speed_ft_min - 150.0).abs() < f64::EPSILON);
        assert_eq!(p.unit, WeightUnit::Klbf);
    }

    #[test]
    fn test_contact_band_outside_slowdown_rejected() {
        let mut config = SimulatorConfig::default();
        config.restrictions.contact_radius_ft = 300.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("contact_radius_ft"));
    }

    #[test]
    fn test_nan_tick_rejected() {
        let mut config = SimulatorConfig::default();
        config.simulation.tick_seconds = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_tick_period_scaled_by_speed() {
        let mut config = SimulatorConfig::default();
        config.simulation.speed_multiplier = 4.0;
        assert_eq!(config.tick_period(), Some(Duration::from_millis(500)));
        config.simulation.speed_multiplier = 0.0;
        assert_eq!(config.tick_period(), None);
    }

    #[test]
    fn test_unrepresentable_tick_period_rejected() {
        let mut config = SimulatorConfig::default();
        config.simulation.speed_multiplier = 1e-300;
        assert_eq!(config.tick_period(), None);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unrepresentable tick period"));
    }

    #[test]
    fn test_toml_round_trip_preserves_policy() {
        let mut config = SimulatorConfig::default();
        config.restrictions.encounter_policy = EncounterPolicy::PerCrossing;
        let text = config.to_toml().unwrap();
        assert!(text.contains("per_crossing"));
        assert_eq!(SimulatorConfig::from_toml_str(&text).unwrap(), config);
    }
}
