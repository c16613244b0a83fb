//! Surface string tension (weight) model
//!
//! ```text
//! base   = tool_weight + weight_per_foot * depth
//! drag   = base * sin(inclination) * friction
//! weight = base + drag   running in
//!          base - drag   pulling out
//!          base          stationary
//! spike  = base * spike_factor * severity   per restriction in contact
//! ```
//!
//! Computed in pounds and converted to the conveyance's reporting unit last.

use serde::{Deserialize, Serialize};

use super::deviation::DeviationLookup;
use super::kinematics::Direction;
use super::restrictions::RestrictionIndex;
use crate::config::{RestrictionSettings, SimulatorConfig};
use crate::types::{ConveyanceParams, Procedure};

/// Breakdown of one tension evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensionReading {
    /// Surface weight in the reporting unit
    pub weight: f64,
    /// Tool plus line weight (lbs)
    pub base_weight_lbs: f64,
    /// Friction drag magnitude (lbs)
    pub drag_lbs: f64,
    /// Sum of restriction spikes (lbs)
    pub spike_lbs: f64,
    /// Ids of restrictions the tool is in contact with
    pub encounters: Vec<usize>,
}

/// Tension model for one procedure's conveyance and tool string.
#[derive(Debug, Clone)]
pub struct TensionModel {
    params: ConveyanceParams,
    tool_weight: f64,
    friction_coefficient: f64,
    contact_radius: f64,
    spike_factor: f64,
}

impl TensionModel {
    pub fn new(procedure: &Procedure, config: &SimulatorConfig) -> Self {
        Self::with_params(
            config.conveyance_params(procedure.conveyance),
            procedure.tool_weight,
            procedure.friction_coefficient,
            &config.restrictions,
        )
    }

    pub const fn with_params(
        params: ConveyanceParams,
        tool_weight: f64,
        friction_coefficient: f64,
        restrictions: &RestrictionSettings,
    ) -> Self {
        Self {
            params,
            tool_weight,
            friction_coefficient,
            contact_radius: restrictions.contact_radius_ft,
            spike_factor: restrictions.tension_spike_factor,
        }
    }

    /// Tool plus line weight at `depth` (lbs).
    pub fn base_weight(&self, depth: f64) -> f64 {
        self.params.weight_per_foot.mul_add(depth, self.tool_weight)
    }

    /// Surface weight at `depth` while travelling in `direction`.
    pub fn tension_at(
        &self,
        depth: f64,
        direction: Direction,
        deviation: &DeviationLookup,
        restrictions: &RestrictionIndex,
    ) -> TensionReading {
        let base = self.base_weight(depth);
        let drag = base * deviation.angle_at_rad(depth).sin() * self.friction_coefficient;

        let mut weight = match direction {
            Direction::InHole => base + drag,
            Direction::OutOfHole => base - drag,
            Direction::Stationary => base,
        };

        let mut spike = 0.0;
        let mut encounters = Vec::new();
        for (restriction, _) in restrictions.within(depth, self.contact_radius) {
            spike += base * self.spike_factor * restriction.severity;
            encounters.push(restriction.id);
        }
        weight += spike;

        TensionReading {
            weight: self.params.unit.from_lbs(weight),
            base_weight_lbs: base,
            drag_lbs: drag,
            spike_lbs: spike,
            encounters,
        }
    }
}
