//! Known flow-area restrictions in the completion

use serde::Serialize;

use crate::types::Completion;

/// A depth-localized reduction of internal diameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restriction {
    /// Position of the item in the completion equipment list
    pub id: usize,
    /// Equipment description, e.g. "Casing Deformation"
    pub item: String,
    /// Depth (ft MD)
    pub top: f64,
    /// Fraction of ID lost, 0.0 - 1.0
    pub severity: f64,
}

impl Restriction {
    pub fn distance_from(&self, depth: f64) -> f64 {
        (depth - self.top).abs()
    }
}

/// Read-only view of the restrictions in a well's completion.
#[derive(Debug, Clone, Default)]
pub struct RestrictionIndex {
    restrictions: Vec<Restriction>,
}

impl RestrictionIndex {
    /// Collect equipment items that carry both a positive severity (after
    /// clamping to 0.0 - 1.0) and a depth. A missing completion yields an
    /// empty index.
    pub fn from_completion(completion: Option<&Completion>) -> Self {
        let restrictions = completion
            .map(|c| {
                c.equipment
                    .iter()
                    .enumerate()
                    .filter_map(|(id, e)| {
                        let severity = e.restriction.filter(|s| s.is_finite())?.clamp(0.0, 1.0);
                        if severity <= 0.0 || e.top == 0.0 || !e.top.is_finite() {
                            return None;
                        }
                        Some(Restriction {
                            id,
                            item: e.item.clone(),
                            top: e.top,
                            severity,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { restrictions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Restriction> {
        self.restrictions.iter()
    }

    /// Restrictions within `radius` ft of `depth`, paired with their distance.
    pub fn within(&self, depth: f64, radius: f64) -> impl Iterator<Item = (&Restriction, f64)> {
        self.restrictions
            .iter()
            .map(move |r| (r, r.distance_from(depth)))
            .filter(move |(_, distance)| *distance <= radius)
    }

    pub fn get(&self, id: usize) -> Option<&Restriction> {
        self.restrictions.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompletionEquipment;

    fn equipment(item: &str, top: f64, restriction: Option<f64>) -> CompletionEquipment {
        CompletionEquipment {
            item: item.to_string(),
            top,
            comments: None,
            is_problem: restriction.is_some(),
            restriction,
        }
    }

    fn w666_completion() -> Completion {
        Completion {
            equipment: vec![
                equipment("SSSV", 2500.0, None),
                equipment("Casing Deformation", 8500.0, Some(0.3)),
                equipment("BaSO4 Scale Bridge", 14200.0, Some(0.4)),
                equipment("Packer", 18250.0, None),
            ],
            ..Completion::default()
        }
    }

    #[test]
    fn test_only_restricting_items_indexed() {
        let index = RestrictionIndex::from_completion(Some(&w666_completion()));
        assert_eq!(index.len(), 2);
        let tops: Vec<f64> = index.iter().map(|r| r.top).collect();
        assert_eq!(tops, vec![8500.0, 14200.0]);
        assert_eq!(index.get(1).map(|r| r.item.as_str()), Some("Casing Deformation"));
    }

    #[test]
    fn test_zero_severity_and_zero_depth_skipped() {
        let completion = Completion {
            equipment: vec![
                equipment("Nipple", 3000.0, Some(0.0)),
                equipment("Wellhead", 0.0, Some(0.5)),
            ],
            ..Completion::default()
        };
        assert!(RestrictionIndex::from_completion(Some(&completion)).is_empty());
    }

    #[test]
    fn test_severity_clamped() {
        let completion = Completion {
            equipment: vec![equipment("Collapse", 9000.0, Some(1.7))],
            ..Completion::default()
        };
        let index = RestrictionIndex::from_completion(Some(&completion));
        assert!((index.iter().next().unwrap().severity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_severity_skipped() {
        let completion = Completion {
            equipment: vec![
                equipment("Bad survey entry", 9000.0, Some(-0.4)),
                equipment("Scale", 12000.0, Some(f64::NAN)),
            ],
            ..Completion::default()
        };
        assert!(RestrictionIndex::from_completion(Some(&completion)).is_empty());
    }

    #[test]
    fn test_missing_completion_is_empty() {
        assert!(RestrictionIndex::from_completion(None).is_empty());
    }

    #[test]
    fn test_within_radius() {
        let index = RestrictionIndex::from_completion(Some(&w666_completion()));
        let near: Vec<(usize, f64)> = index.within(8400.0, 200.0).map(|(r, d)| (r.id, d)).collect();
        assert_eq!(near, vec![(1, 100.0)]);
        assert_eq!(index.within(8490.0, 10.0).count(), 1);
        assert_eq!(index.within(8489.0, 10.0).count(), 0);
    }
}
