//! Post-job report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::physics_engine::EnvelopeSummary;
use crate::types::{ConveyanceType, LiveData, LogEntry, TraceSample, WeightUnit};

/// Everything the post-job analysis needs, captured when the job finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: Uuid,
    pub well_id: String,
    pub well_name: String,
    pub procedure_name: String,
    pub conveyance: ConveyanceType,
    pub weight_unit: WeightUnit,
    /// Snapshot after the last tick
    pub final_state: LiveData,
    pub lessons: Vec<String>,
    /// Chronological operations log
    pub log: Vec<LogEntry>,
    /// Retained trace samples, oldest first
    pub trace: Vec<TraceSample>,
    /// Retained trace checked against the alarm envelopes
    pub envelope: EnvelopeSummary,
    pub ticks: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl JobReport {
    pub fn op_time_hours(&self) -> f64 {
        self.final_state.op_time / 3600.0
    }

    pub fn npt_hours(&self) -> f64 {
        self.final_state.npt / 3600.0
    }

    /// True once the procedure ran to its last step.
    pub const fn is_complete(&self) -> bool {
        !self.final_state.job_running
    }

    pub fn wall_time_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}
