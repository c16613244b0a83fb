//! Procedure types: conveyance, envelope curves and planning records

use serde::{Deserialize, Serialize};

// ============================================================================
// Conveyance
// ============================================================================

/// Method used to convey tools into the well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConveyanceType {
    #[serde(rename = "Slickline")]
    Slickline,
    #[serde(rename = "E-Line")]
    ELine,
    #[serde(rename = "Coiled Tubing")]
    CoiledTubing,
}

impl ConveyanceType {
    pub const ALL: [Self; 3] = [Self::Slickline, Self::ELine, Self::CoiledTubing];

    /// Get display name for UI
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Slickline => "Slickline",
            Self::ELine => "E-Line",
            Self::CoiledTubing => "Coiled Tubing",
        }
    }
}

impl std::fmt::Display for ConveyanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Unit used when reporting string weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    /// Thousand pounds-force
    Klbf,
}

impl WeightUnit {
    /// Convert a weight in pounds into this unit.
    pub fn from_lbs(self, lbs: f64) -> f64 {
        match self {
            Self::Lbs => lbs,
            Self::Klbf => lbs / 1000.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Klbf => "klbf",
        }
    }
}

/// Physical parameters of a conveyance type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConveyanceParams {
    /// Line weight (lbs/ft)
    pub weight_per_foot: f64,
    /// Maximum running speed (ft/min)
    pub max_speed_ft_min: f64,
    /// Reporting unit for weight
    pub unit: WeightUnit,
}

impl ConveyanceParams {
    /// Built-in parameters for each conveyance type.
    pub const fn for_type(conveyance: ConveyanceType) -> Self {
        match conveyance {
            ConveyanceType::Slickline => Self {
                weight_per_foot: 0.02,
                max_speed_ft_min: 400.0,
                unit: WeightUnit::Lbs,
            },
            ConveyanceType::ELine => Self {
                weight_per_foot: 0.15,
                max_speed_ft_min: 200.0,
                unit: WeightUnit::Klbf,
            },
            ConveyanceType::CoiledTubing => Self {
                weight_per_foot: 2.5,
                max_speed_ft_min: 80.0,
                unit: WeightUnit::Klbf,
            },
        }
    }
}

// ============================================================================
// TFA Envelope Model
// ============================================================================

/// Ordered (depth, weight) control points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Planned tension/friction analysis curves for a procedure.
///
/// All weights are in the conveyance's reporting unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TfaModel {
    /// Planned pick-up weight curve
    pub pick_up: Polyline,
    /// Planned slack-off weight curve
    pub slack_off: Polyline,
    /// Upper alarm envelope
    pub alarm_upper: Polyline,
    /// Lower alarm envelope
    pub alarm_lower: Polyline,
}

// ============================================================================
// Procedure
// ============================================================================

/// A planned intervention procedure, resolved before the job starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    pub name: String,
    pub conveyance: ConveyanceType,
    /// Tool string weight (lbs)
    pub tool_weight: f64,
    pub friction_coefficient: f64,
    /// Free-text step descriptions, executed strictly in order
    pub steps: Vec<String>,
    pub tfa_model: TfaModel,
}

// ============================================================================
// Planning Records
// ============================================================================

/// Intervention objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Well problem with the objectives that address it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub name: String,
    pub linked_objectives: Vec<String>,
}

/// Recommended objective for a problem, backed by case-study history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    pub objective_id: String,
    /// Confidence (percent)
    pub confidence: u8,
    pub outcome: String,
    pub reason: String,
}
