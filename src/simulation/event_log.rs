//! Append-only operations log
//!
//! Entries are stored chronologically and shown most-recent-first. Every
//! entry is mirrored to `tracing` with the job id, tick and depth attached.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{LogEntry, LogLevel};

/// Actor label for entries written by the simulator itself.
pub const SYSTEM_USER: &str = "System";

/// Where in the job an entry was written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    /// Simulated job time (s)
    pub elapsed_secs: f64,
    /// Tool depth (ft)
    pub depth: f64,
}

#[derive(Debug, Clone)]
pub struct EventLog {
    job_id: Uuid,
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub const fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            entries: Vec::new(),
        }
    }

    pub fn info(&mut self, text: impl Into<String>, ctx: TickContext) {
        self.record(LogLevel::Info, text, ctx);
    }

    pub fn warning(&mut self, text: impl Into<String>, ctx: TickContext) {
        self.record(LogLevel::Warning, text, ctx);
    }

    pub fn record(&mut self, level: LogLevel, text: impl Into<String>, ctx: TickContext) {
        let text = text.into();
        match level {
            LogLevel::Info => info!(
                job_id = %self.job_id,
                tick = ctx.tick,
                depth = ctx.depth,
                "{}",
                text
            ),
            LogLevel::Warning => warn!(
                job_id = %self.job_id,
                tick = ctx.tick,
                depth = ctx.depth,
                "{}",
                text
            ),
        }
        self.entries.push(LogEntry {
            time: Utc::now(),
            elapsed_secs: ctx.elapsed_secs,
            user: SYSTEM_USER.to_string(),
            level,
            text,
        });
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level == LogLevel::Warning)
    }
}
