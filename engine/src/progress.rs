//! Staged progress events emitted during a simulation run.
//!
//! Events are delivered synchronously, in emission order, through a
//! [`ProgressSink`]. The sink is also the point where a caller can ask the run
//! to stop: `should_abort` is consulted before every batch.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity tag attached to each stage message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Process,
    Success,
    Warning,
}

/// One human-readable progress stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub severity: Severity,
}

impl Stage {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Stage {
            timestamp: Utc::now(),
            message: message.into(),
            severity,
        }
    }
}

/// Consumer of progress events.
///
/// `percent` is in `[0, 100]` and never decreases within a run.
pub trait ProgressSink {
    fn on_progress(&mut self, percent: u8, stage: &Stage);

    /// Checked between batches; returning true abandons the run.
    fn should_abort(&self) -> bool {
        false
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(u8, &Stage),
{
    fn on_progress(&mut self, percent: u8, stage: &Stage) {
        self(percent, stage)
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _percent: u8, _stage: &Stage) {}
}

/// Sink that keeps every event, in order
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    pub events: Vec<(u8, Stage)>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentages in emission order
    pub fn percents(&self) -> Vec<u8> {
        self.events.iter().map(|(p, _)| *p).collect()
    }

    /// Messages in emission order
    pub fn messages(&self) -> Vec<&str> {
        self.events.iter().map(|(_, s)| s.message.as_str()).collect()
    }
}

impl ProgressSink for ProgressLog {
    fn on_progress(&mut self, percent: u8, stage: &Stage) {
        self.events.push((percent, stage.clone()));
    }
}

/// Wraps a sink and enforces the non-decreasing percentage contract.
pub(crate) struct Reporter<'a, S: ProgressSink + ?Sized> {
    sink: &'a mut S,
    last_percent: u8,
}

impl<'a, S: ProgressSink + ?Sized> Reporter<'a, S> {
    pub(crate) fn new(sink: &'a mut S) -> Self {
        Reporter {
            sink,
            last_percent: 0,
        }
    }

    pub(crate) fn emit(&mut self, percent: u8, severity: Severity, message: impl Into<String>) {
        let percent = percent.clamp(self.last_percent, 100);
        self.last_percent = percent;
        let stage = Stage::new(severity, message);
        self.sink.on_progress(percent, &stage);
    }

    pub(crate) fn should_abort(&self) -> bool {
        self.sink.should_abort()
    }
}
