//! Structured step directive parsed from free-text procedure steps
//!
//! Step descriptions such as "RIH with gauge ring to 2,450ft to confirm
//! access." carry a directional verb and a target depth. Both are extracted
//! once, when the job is set up, so the tick loop never touches text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Intended tool movement for a step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Run in hole (downward traversal)
    RunInHole,
    /// Pull out of hole (upward traversal)
    PullOutOfHole,
    /// No traversal; the step completes on its first tick
    #[default]
    Stationary,
}

impl Motion {
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::RunInHole => "RIH",
            Self::PullOutOfHole => "POOH",
            Self::Stationary => "STATIC",
        }
    }
}

/// What a step asks the tool string to do.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct StepDirective {
    pub motion: Motion,
    /// Target depth (ft MD); `None` when the text names no depth
    pub target_depth: Option<f64>,
}

impl StepDirective {
    pub const fn new(motion: Motion, target_depth: Option<f64>) -> Self {
        Self {
            motion,
            target_depth,
        }
    }

    /// Parse a free-text step description.
    ///
    /// Pull-out wins when both verbs appear. The first depth in the text is
    /// the target.
    pub fn parse(text: &str) -> Self {
        let motion = if pull_out_regex().is_match(text) {
            Motion::PullOutOfHole
        } else if run_in_regex().is_match(text) {
            Motion::RunInHole
        } else {
            Motion::Stationary
        };
        Self {
            motion,
            target_depth: parse_target_depth(text),
        }
    }

    /// Depth at which the step is complete.
    ///
    /// A step without a depth resolves to surface: a run-in with no depth is
    /// therefore complete immediately and a pull-out runs to surface.
    pub fn resolved_target(&self) -> f64 {
        self.target_depth.unwrap_or(0.0)
    }
}

/// Extract the first depth of the form `2,450ft`, `14000ft` or `950 feet`.
pub fn parse_target_depth(text: &str) -> Option<f64> {
    let caps = depth_regex().captures(text)?;
    let digits: String = caps.get(1)?.as_str().chars().filter(|c| *c != ',').collect();
    digits.parse::<f64>().ok()
}

fn depth_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,3}(?:,\d{3})+|\d+)\s*(?:ft|feet)\b")
            .expect("depth pattern is valid")
    })
}

fn run_in_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\brih\b|\brun(?:ning)?\s+in(?:to)?\s+(?:the\s+)?hole\b")
            .expect("run-in pattern is valid")
    })
}

fn pull_out_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bpooh\b|\bpull(?:ing)?\s+out\s+of\s+(?:the\s+)?hole\b")
            .expect("pull-out pattern is valid")
    })
}
