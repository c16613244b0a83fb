//! Simulator Configuration Module
//!
//! Engine constants (tick length, restriction bands, conveyance limits)
//! loaded from TOML, falling back to built-in defaults.
//!
//! ## Loading Order
//!
//! 1. `WELLTEGRA_CONFIG` environment variable (path to TOML file)
//! 2. `welltegra.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! let config = SimulatorConfig::load();
//! let simulator = Simulator::new(&well, &procedure, &config);
//! ```

mod simulator_config;
pub mod defaults;
pub mod validation;

pub use simulator_config::*;
