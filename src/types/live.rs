//! Live job snapshot and operations log types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alarm classification for the live weight reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    #[default]
    None,
    Warning,
    Danger,
}

/// Snapshot of the live job, replaced once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveData {
    /// Tool depth (ft MD), never negative
    pub depth: f64,
    /// Surface string weight in the conveyance's unit
    pub weight: f64,
    /// Running speed (ft/min), positive into the hole
    pub speed: f64,
    /// Wellhead pressure (psi), reserved
    pub pressure: f64,
    /// Index of the active step (last step once finished)
    pub current_step: usize,
    pub job_running: bool,
    pub alarm_state: AlarmState,
    /// Non-productive time (s)
    pub npt: f64,
    /// Operational time (s)
    pub op_time: f64,
}

impl Default for LiveData {
    fn default() -> Self {
        Self {
            depth: 0.0,
            weight: 0.0,
            speed: 0.0,
            pressure: 0.0,
            current_step: 0,
            job_running: true,
            alarm_state: AlarmState::None,
            npt: 0.0,
            op_time: 0.0,
        }
    }
}

/// One (depth, weight) point of the actual-weight trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub depth: f64,
    pub weight: f64,
}

/// Severity of an operations log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
}

/// Operations log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time the entry was written
    pub time: DateTime<Utc>,
    /// Simulated job time (s) at which the entry was written
    pub elapsed_secs: f64,
    /// Who wrote the entry, e.g. "System"
    pub user: String,
    pub level: LogLevel,
    pub text: String,
}
