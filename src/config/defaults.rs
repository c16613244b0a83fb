//! System-wide default constants.
//!
//! Every value here is the built-in default of a `SimulatorConfig` field.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Simulation Clock
// ============================================================================

/// Simulated time advanced by one tick (seconds).
pub const TICK_SECONDS: f64 = 2.0;

/// Wall-clock compression factor. 1.0 = real time.
pub const SPEED_MULTIPLIER: f64 = 1.0;

/// Capacity of the (depth, weight) trace ring buffer.
pub const TRACE_CAPACITY: usize = 500;

/// Upper bound on ticks for a single job before the run is abandoned.
///
/// 1 000 000 ticks at 2 s = ~23 simulated days.
pub const MAX_TICKS: u64 = 1_000_000;

// ============================================================================
// Restrictions
// ============================================================================

/// Distance over which running speed is eased down toward a restriction (ft).
pub const SLOWDOWN_RADIUS_FT: f64 = 200.0;

/// Distance at which the tool string is considered to be in the restriction (ft).
pub const CONTACT_RADIUS_FT: f64 = 10.0;

/// Fraction of target speed retained at zero distance from a restriction.
pub const MIN_SPEED_FRACTION: f64 = 0.1;

/// Extra tension per unit severity, as a fraction of base weight.
pub const TENSION_SPIKE_FACTOR: f64 = 0.5;

// ============================================================================
// CLI
// ============================================================================

/// Well simulated when none is given on the command line.
pub const DEFAULT_WELL_ID: &str = "W666";

/// Objective simulated when neither objective nor problem is given.
pub const DEFAULT_OBJECTIVE_ID: &str = "obj3";

/// Config file searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "welltegra.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "WELLTEGRA_CONFIG";
