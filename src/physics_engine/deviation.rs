//! Wellbore inclination lookup from a sparse deviation survey

use crate::types::SurveyStation;

/// Step-function inclination lookup over survey stations.
///
/// The angle at a depth is the angle of the last station (in survey order)
/// whose measured depth is at or above that depth. No interpolation is done
/// between stations.
#[derive(Debug, Clone, Default)]
pub struct DeviationLookup {
    stations: Vec<SurveyStation>,
}

impl DeviationLookup {
    pub fn new(stations: &[SurveyStation]) -> Self {
        Self {
            stations: stations.to_vec(),
        }
    }

    /// Inclination (degrees) at `depth`. Returns 0 above the first station
    /// or when there is no survey.
    pub fn angle_at(&self, depth: f64) -> f64 {
        self.stations
            .iter()
            .rev()
            .find(|s| s.md <= depth)
            .map_or(0.0, |s| s.angle)
    }

    /// Inclination (radians) at `depth`.
    pub fn angle_at_rad(&self, depth: f64) -> f64 {
        self.angle_at(depth).to_radians()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
