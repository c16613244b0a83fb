//! Well-Tegra: Well Intervention Live-Operation Simulator
//!
//! Simulates a wireline or coiled-tubing intervention against a well's
//! survey and completion, tick by tick, and reports how the plan held up.
//!
//! ## Architecture
//!
//! - **Catalog**: Wells, problems, objectives and procedures; job planning
//! - **Procedure**: Step directives and the step state machine
//! - **Physics Engine**: Deviation lookup, restrictions, kinematics, tension
//! - **Simulation**: Synchronous tick core and the paced clock actor
//! - **Config**: TOML-tunable engine constants

pub mod catalog;
pub mod config;
pub mod physics_engine;
pub mod procedure;
pub mod simulation;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, EncounterPolicy, SimulatorConfig};

// Re-export catalog and planning
pub use catalog::{Catalog, CatalogError, JobPlan};

// Re-export commonly used types
pub use types::{
    AlarmState, ConveyanceType, LiveData, LogEntry, Procedure, TraceSample, WeightUnit, Well,
};

// Re-export simulation
pub use simulation::{
    ClockHandle, JobObserver, JobReport, SimulationClock, SimulationError, Simulator,
};
