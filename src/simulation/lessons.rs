//! Lessons learned and restriction encounter tracking

use std::collections::HashSet;

use crate::config::EncounterPolicy;
use crate::physics_engine::Restriction;

pub const SUCCESS_LESSON: &str =
    "The AI-guided plan was executed successfully, validating the historical case study data.";

/// Depth formatted without a trailing `.0` for whole feet.
pub fn format_depth(depth: f64) -> String {
    if depth.fract() == 0.0 {
        format!("{depth:.0}")
    } else {
        format!("{depth}")
    }
}

/// Log text for a restriction encounter.
pub fn restriction_warning(restriction: &Restriction) -> String {
    format!(
        "WARNING: Encountered restriction at {}ft. Increased tension observed.",
        format_depth(restriction.top)
    )
}

pub fn restriction_lesson(restriction: &Restriction) -> String {
    format!(
        "High friction at {}ft confirms {} (severity {:.0}%), validating the pre-job restriction data.",
        format_depth(restriction.top),
        restriction.item,
        restriction.severity * 100.0
    )
}

// ============================================================================
// Encounter Tracker
// ============================================================================

/// Decides which restrictions in contact this tick count as an encounter.
#[derive(Debug, Clone)]
pub struct EncounterTracker {
    policy: EncounterPolicy,
    /// Restrictions reported at least once this job
    reported: HashSet<usize>,
    /// Restrictions in contact on the previous tick
    in_band: HashSet<usize>,
}

impl EncounterTracker {
    pub fn new(policy: EncounterPolicy) -> Self {
        Self {
            policy,
            reported: HashSet::new(),
            in_band: HashSet::new(),
        }
    }

    pub const fn policy(&self) -> EncounterPolicy {
        self.policy
    }

    /// Feed the restriction ids in contact this tick; returns the ids to
    /// report, in input order.
    pub fn observe(&mut self, in_contact: &[usize]) -> Vec<usize> {
        let report: Vec<usize> = in_contact
            .iter()
            .copied()
            .filter(|id| match self.policy {
                EncounterPolicy::Once => !self.reported.contains(id),
                EncounterPolicy::PerCrossing => !self.in_band.contains(id),
                EncounterPolicy::EveryTick => true,
            })
            .collect();

        self.reported.extend(report.iter().copied());
        self.in_band = in_contact.iter().copied().collect();
        report
    }
}

// ============================================================================
// Lesson Generator
// ============================================================================

/// Accumulates lessons for the post-job report.
#[derive(Debug, Clone)]
pub struct LessonGenerator {
    tracker: EncounterTracker,
    lessons: Vec<String>,
}

impl LessonGenerator {
    pub fn new(policy: EncounterPolicy) -> Self {
        Self {
            tracker: EncounterTracker::new(policy),
            lessons: Vec::new(),
        }
    }

    /// Record lessons for the restrictions in contact this tick.
    ///
    /// Returns the restrictions that count as an encounter under the
    /// configured policy, so the caller can log them.
    pub fn observe_contacts<'a>(&mut self, contacts: &[&'a Restriction]) -> Vec<&'a Restriction> {
        let ids: Vec<usize> = contacts.iter().map(|r| r.id).collect();
        let reported = self.tracker.observe(&ids);

        let encountered: Vec<&'a Restriction> = contacts
            .iter()
            .copied()
            .filter(|r| reported.contains(&r.id))
            .collect();
        for restriction in &encountered {
            self.lessons.push(restriction_lesson(restriction));
        }
        encountered
    }

    pub fn record_success(&mut self) {
        self.lessons.push(SUCCESS_LESSON.to_string());
    }

    pub fn lessons(&self) -> &[String] {
        &self.lessons
    }
}
