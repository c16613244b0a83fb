//! Well reference data: survey, completion and history

use serde::{Deserialize, Serialize};

/// A single deviation survey station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyStation {
    /// Measured depth (ft)
    pub md: f64,
    /// Inclination from vertical (degrees)
    pub angle: f64,
}

impl SurveyStation {
    pub const fn new(md: f64, angle: f64) -> Self {
        Self { md, angle }
    }
}

/// Casing or tubing interval in the completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionItem {
    /// String type, e.g. "Production"
    #[serde(rename = "type")]
    pub kind: String,
    /// Nominal size as written on the schematic, e.g. "9 5/8"
    pub size: String,
    /// Top of interval (ft MD)
    pub top: f64,
    /// Bottom of interval (ft MD)
    pub bottom: f64,
    #[serde(default, rename = "isProblem")]
    pub is_problem: bool,
}

/// Point equipment item in the completion (valve, packer, deformation...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEquipment {
    /// Descriptive name
    pub item: String,
    /// Depth of the item (ft MD)
    pub top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, rename = "isProblem")]
    pub is_problem: bool,
    /// Fraction of internal diameter lost at this point, 0.0 - 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restriction: Option<f64>,
}

/// Perforated interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perforation {
    pub top: f64,
    pub bottom: f64,
}

/// Well completion: tubulars, equipment and perforations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub casing: Vec<CompletionItem>,
    #[serde(default)]
    pub tubing: Vec<CompletionItem>,
    #[serde(default)]
    pub equipment: Vec<CompletionEquipment>,
    #[serde(default)]
    pub perforations: Vec<Perforation>,
}

/// A past operation on the well and what was learned from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellHistory {
    pub date: String,
    pub operation: String,
    pub problem: String,
    pub lesson: String,
}

/// Static well record. Immutable for the duration of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub id: String,
    pub name: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub well_type: Option<String>,
    /// Total depth as displayed, e.g. "18,500ft"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,
    pub status: String,
    pub issue: String,
    #[serde(default)]
    pub history: Vec<WellHistory>,
    /// Deviation survey, ordered by measured depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation: Option<Vec<SurveyStation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion: Option<Completion>,
}

impl Well {
    /// Survey stations, empty when the well has no survey on record.
    pub fn survey(&self) -> &[SurveyStation] {
        self.deviation.as_deref().unwrap_or(&[])
    }

    /// True when the well carries enough data to drive a live simulation.
    pub fn is_simulation_ready(&self) -> bool {
        self.deviation.as_ref().is_some_and(|d| !d.is_empty()) && self.completion.is_some()
    }
}
