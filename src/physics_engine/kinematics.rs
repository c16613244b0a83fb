//! Per-tick depth and speed update
//!
//! Speed is set from the step's intent and the conveyance speed limit, eased
//! down near restrictions, then integrated over one tick. The step is
//! complete once the tool reaches (or passes) its target.

use serde::{Deserialize, Serialize};

use super::restrictions::RestrictionIndex;
use crate::config::{RestrictionSettings, SimulatorConfig};
use crate::procedure::{Motion, StepDirective};
use crate::types::ConveyanceType;

/// Direction the tool string travelled during a tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    InHole,
    OutOfHole,
    #[default]
    Stationary,
}

impl Direction {
    pub fn from_speed(speed: f64) -> Self {
        if speed > 0.0 {
            Self::InHole
        } else if speed < 0.0 {
            Self::OutOfHole
        } else {
            Self::Stationary
        }
    }
}

/// Result of advancing the tool string by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicsUpdate {
    /// Depth after the tick (ft), snapped to the target once reached
    pub depth: f64,
    /// Speed to report (ft/min), zero once the target is reached
    pub speed: f64,
    /// Speed actually travelled during the tick (ft/min)
    pub travel_speed: f64,
    pub reached_target: bool,
}

impl KinematicsUpdate {
    pub fn direction(&self) -> Direction {
        Direction::from_speed(self.travel_speed)
    }
}

/// Kinematics for one conveyance type.
#[derive(Debug, Clone)]
pub struct KinematicsModel {
    /// Conveyance speed limit (ft/min)
    max_speed: f64,
    /// Simulated seconds per tick
    tick_seconds: f64,
    slowdown_radius: f64,
    min_speed_fraction: f64,
}

impl KinematicsModel {
    pub fn new(conveyance: ConveyanceType, config: &SimulatorConfig) -> Self {
        Self::with_limits(
            config.conveyance_params(conveyance).max_speed_ft_min,
            config.simulation.tick_seconds,
            &config.restrictions,
        )
    }

    pub const fn with_limits(
        max_speed: f64,
        tick_seconds: f64,
        restrictions: &RestrictionSettings,
    ) -> Self {
        Self {
            max_speed,
            tick_seconds,
            slowdown_radius: restrictions.slowdown_radius_ft,
            min_speed_fraction: restrictions.min_speed_fraction,
        }
    }

    /// Speed multiplier at `distance` ft from a restriction: the minimum
    /// fraction at contact, easing linearly to full speed at the radius.
    pub fn damping(&self, distance: f64) -> f64 {
        let ease = (distance / self.slowdown_radius).clamp(0.0, 1.0);
        self.min_speed_fraction + ease * (1.0 - self.min_speed_fraction)
    }

    /// Advance one tick from `depth` under `directive`.
    pub fn advance(
        &self,
        depth: f64,
        directive: &StepDirective,
        restrictions: &RestrictionIndex,
    ) -> KinematicsUpdate {
        let mut target_speed = match directive.motion {
            Motion::RunInHole => self.max_speed,
            Motion::PullOutOfHole => -self.max_speed,
            Motion::Stationary => 0.0,
        };

        // Every restriction in range slows the string; effects compound
        for (_, distance) in restrictions.within(depth, self.slowdown_radius) {
            target_speed *= self.damping(distance);
        }

        let moved = (target_speed / 60.0).mul_add(self.tick_seconds, depth).max(0.0);
        let target = directive.resolved_target();

        let reached_target = match directive.motion {
            Motion::RunInHole => moved >= target,
            Motion::PullOutOfHole => moved <= target,
            Motion::Stationary => true,
        };

        if reached_target {
            KinematicsUpdate {
                depth: if target > 0.0 { target } else { moved },
                speed: 0.0,
                travel_speed: target_speed,
                reached_target,
            }
        } else {
            KinematicsUpdate {
                depth: moved,
                speed: target_speed,
                travel_speed: target_speed,
                reached_target,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Completion, CompletionEquipment};

    fn slickline() -> KinematicsModel {
        KinematicsModel::new(ConveyanceType::Slickline, &SimulatorConfig::default())
    }

    fn restriction_at(top: f64, severity: f64) -> RestrictionIndex {
        RestrictionIndex::from_completion(Some(&Completion {
            equipment: vec![CompletionEquipment {
                item: "Casing Deformation".to_string(),
                top,
                comments: None,
                is_problem: true,
                restriction: Some(severity),
            }],
            ..Completion::default()
        }))
    }

    #[test]
    fn test_rih_moves_at_max_speed() {
        let k = slickline();
        let d = StepDirective::new(Motion::RunInHole, Some(2450.0));
        let u = k.advance(0.0, &d, &RestrictionIndex::default());
        assert!((u.speed - 400.0).abs() < 1e-9);
        assert!((u.depth - 400.0 / 60.0 * 2.0).abs() < 1e-9);
        assert!(!u.reached_target);
        assert_eq!(u.direction(), Direction::InHole);
    }

    #[test]
    fn test_rih_snaps_to_target() {
        let k = slickline();
        let d = StepDirective::new(Motion::RunInHole, Some(2450.0));
        let u = k.advance(2440.0, &d, &RestrictionIndex::default());
        assert!(u.reached_target);
        assert!((u.depth - 2450.0).abs() < f64::EPSILON);
        assert!(u.speed.abs() < f64::EPSILON);
        // Travel during the tick is still reported for drag
        assert_eq!(u.direction(), Direction::InHole);
    }

    #[test]
    fn test_pooh_to_surface_clamps_at_zero() {
        let k = slickline();
        let d = StepDirective::new(Motion::PullOutOfHole, None);
        let u = k.advance(5.0, &d, &RestrictionIndex::default());
        assert!(u.reached_target);
        assert!(u.depth.abs() < f64::EPSILON);
        assert!(u.speed.abs() < f64::EPSILON);
    }

    #[test]
    fn test_pooh_in_progress() {
        let k = slickline();
        let d = StepDirective::new(Motion::PullOutOfHole, None);
        let u = k.advance(1000.0, &d, &RestrictionIndex::default());
        assert!(!u.reached_target);
        assert!((u.speed + 400.0).abs() < 1e-9);
        assert!(u.depth < 1000.0);
    }

    #[test]
    fn test_stationary_completes_immediately_and_snaps() {
        let k = slickline();
        let u = k.advance(
            8000.0,
            &StepDirective::new(Motion::Stationary, Some(8500.0)),
            &RestrictionIndex::default(),
        );
        assert!(u.reached_target);
        assert!((u.depth - 8500.0).abs() < f64::EPSILON);

        let u = k.advance(1234.0, &StepDirective::default(), &RestrictionIndex::default());
        assert!(u.reached_target);
        assert!((u.depth - 1234.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rih_without_target_completes_immediately() {
        let k = slickline();
        let u = k.advance(
            3000.0,
            &StepDirective::new(Motion::RunInHole, None),
            &RestrictionIndex::default(),
        );
        assert!(u.reached_target);
        assert!(u.depth > 3000.0);
    }

    #[test]
    fn test_damping_near_restriction() {
        let k = slickline();
        assert!((k.damping(0.0) - 0.1).abs() < 1e-12);
        assert!((k.damping(100.0) - 0.55).abs() < 1e-12);
        assert!((k.damping(200.0) - 1.0).abs() < 1e-12);

        let index = restriction_at(8500.0, 0.3);
        let d = StepDirective::new(Motion::RunInHole, Some(9000.0));
        let u = k.advance(8400.0, &d, &index);
        assert!((u.speed - 400.0 * 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_damping_compounds_across_restrictions() {
        let k = slickline();
        let index = RestrictionIndex::from_completion(Some(&Completion {
            equipment: vec![
                CompletionEquipment {
                    item: "Casing Deformation".to_string(),
                    top: 8500.0,
                    comments: None,
                    is_problem: true,
                    restriction: Some(0.3),
                },
                CompletionEquipment {
                    item: "Scale Bridge".to_string(),
                    top: 8550.0,
                    comments: None,
                    is_problem: true,
                    restriction: Some(0.4),
                },
            ],
            ..Completion::default()
        }));

        let d = StepDirective::new(Motion::RunInHole, Some(9000.0));
        let u = k.advance(8400.0, &d, &index);
        // 100 ft and 150 ft away
        let expected = 400.0 * k.damping(100.0) * k.damping(150.0);
        assert!((u.speed - expected).abs() < 1e-9);
        assert!((u.speed - 400.0 * 0.55 * 0.775).abs() < 1e-9);
    }

    #[test]
    fn test_depth_never_negative() {
        let k = slickline();
        let d = StepDirective::new(Motion::PullOutOfHole, Some(0.0));
        for start in [0.0, 1.0, 13.0, 13.34] {
            let u = k.advance(start, &d, &RestrictionIndex::default());
            assert!(u.depth >= 0.0);
        }
    }
}
