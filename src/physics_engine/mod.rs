//! Physics Engine Module
//!
//! Deterministic kinematics and tension calculations for the live-operation
//! simulator. Plausible, not certified: enough to drive a dashboard trace.
//!
//! ## Per-Tick Functions
//! - `DeviationLookup::angle_at()` - inclination from the deviation survey
//! - `RestrictionIndex::within()` - restrictions near a depth
//! - `KinematicsModel::advance()` - new depth/speed, target reached?
//! - `TensionModel::tension_at()` - surface weight incl. drag and spikes
//!
//! ## Post-Job Functions
//! - `EnvelopeSummary::evaluate()` - trace vs. planned alarm envelopes

pub mod deviation;
pub mod envelope;
pub mod kinematics;
pub mod restrictions;
pub mod tension;

pub use deviation::DeviationLookup;
pub use envelope::EnvelopeSummary;
pub use kinematics::{Direction, KinematicsModel, KinematicsUpdate};
pub use restrictions::{Restriction, RestrictionIndex};
pub use tension::{TensionModel, TensionReading};
