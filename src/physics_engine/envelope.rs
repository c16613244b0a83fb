//! Planned envelope evaluation
//!
//! Linear interpolation over TFA polylines and a post-job comparison of the
//! actual weight trace against the alarm envelopes.

use serde::{Deserialize, Serialize};

use crate::types::{Polyline, TfaModel, TraceSample};

impl Polyline {
    /// Weight on the polyline at `depth`, linearly interpolated between
    /// control points and held flat beyond the end points.
    ///
    /// Returns `None` for an empty polyline.
    pub fn value_at(&self, depth: f64) -> Option<f64> {
        let (first, last) = (self.points.first()?, self.points.last()?);
        if depth <= first.0 {
            return Some(first.1);
        }
        if depth >= last.0 {
            return Some(last.1);
        }
        self.points
            .windows(2)
            .find(|w| depth >= w[0].0 && depth <= w[1].0)
            .map(|w| {
                let (d0, w0) = w[0];
                let (d1, w1) = w[1];
                if (d1 - d0).abs() < f64::EPSILON {
                    w0
                } else {
                    w0 + (w1 - w0) * (depth - d0) / (d1 - d0)
                }
            })
    }
}

/// Comparison of an actual weight trace against the planned alarm envelopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeSummary {
    pub samples_checked: usize,
    /// Samples heavier than the upper alarm envelope
    pub above_upper: usize,
    /// Samples lighter than the lower alarm envelope
    pub below_lower: usize,
    /// Heaviest sample seen
    pub peak: Option<TraceSample>,
}

impl EnvelopeSummary {
    pub fn evaluate<'a>(
        samples: impl IntoIterator<Item = &'a TraceSample>,
        model: &TfaModel,
    ) -> Self {
        let mut summary = Self::default();
        for sample in samples {
            summary.samples_checked += 1;
            if model
                .alarm_upper
                .value_at(sample.depth)
                .is_some_and(|upper| sample.weight > upper)
            {
                summary.above_upper += 1;
            }
            if model
                .alarm_lower
                .value_at(sample.depth)
                .is_some_and(|lower| sample.weight < lower)
            {
                summary.below_lower += 1;
            }
            if summary.peak.map_or(true, |p| sample.weight > p.weight) {
                summary.peak = Some(*sample);
            }
        }
        summary
    }

    pub const fn excursions(&self) -> usize {
        self.above_upper + self.below_lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slickline_model() -> TfaModel {
        TfaModel {
            pick_up: Polyline::new(vec![(0.0, 150.0), (2500.0, 250.0)]),
            slack_off: Polyline::new(vec![(0.0, 150.0), (2500.0, 50.0)]),
            alarm_upper: Polyline::new(vec![(0.0, 350.0), (2500.0, 450.0)]),
            alarm_lower: Polyline::new(vec![(0.0, -50.0), (2500.0, -150.0)]),
        }
    }

    #[test]
    fn test_interpolation() {
        let line = Polyline::new(vec![(0.0, 150.0), (2500.0, 250.0)]);
        assert!((line.value_at(1250.0).unwrap() - 200.0).abs() < 1e-9);
        assert!((line.value_at(-10.0).unwrap() - 150.0).abs() < 1e-9);
        assert!((line.value_at(9000.0).unwrap() - 250.0).abs() < 1e-9);
        assert!(Polyline::default().value_at(100.0).is_none());
    }

    #[test]
    fn test_single_point_polyline_is_flat() {
        let line = Polyline::new(vec![(1000.0, 42.0)]);
        assert!((line.value_at(0.0).unwrap() - 42.0).abs() < f64::EPSILON);
        assert!((line.value_at(5000.0).unwrap() - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_counts_excursions() {
        let samples = [
            TraceSample { depth: 0.0, weight: 150.0 },
            TraceSample { depth: 1250.0, weight: 420.0 },
            TraceSample { depth: 2500.0, weight: -200.0 },
        ];
        let summary = EnvelopeSummary::evaluate(&samples, &slickline_model());
        assert_eq!(summary.samples_checked, 3);
        assert_eq!(summary.above_upper, 1);
        assert_eq!(summary.below_lower, 1);
        assert_eq!(summary.excursions(), 2);
        assert_eq!(summary.peak, Some(samples[1]));
    }
}
