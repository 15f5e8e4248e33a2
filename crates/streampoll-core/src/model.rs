//! Core data model: tasks, raw probe results, and terminal outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One unit of polling work: a stream id plus the progress marker it must
/// have reached for the poll to count as advanced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTask {
    /// Opaque identifier of the stream being probed.
    pub resource_id: String,
    /// Minimum progress marker the stream must have reached.
    pub min_marker: i64,
}

/// Raw output of one probe invocation, owned by the call that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResult {
    /// Process exit code. A probe killed by a signal reports a non-zero
    /// placeholder.
    pub exit_code: i32,
    /// Full captured standard output.
    pub stdout: String,
    /// Full captured standard error.
    pub stderr: String,
}

/// Classification of a finished task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The stream reached or passed its required marker.
    Advanced,
    /// The probe answered cleanly but the stream is still behind.
    NotAdvanced,
    /// The probe exited 0 but its output could not be interpreted.
    ParseError,
    /// The probe could not be started or exited non-zero.
    ProbeFailed,
}

/// Terminal per-task result. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    /// The task that produced this outcome.
    pub task: ResourceTask,
    /// Classification of the result.
    pub status: OutcomeStatus,
    /// Marker extracted from the probe output, when parsing got that far.
    #[serde(default)]
    pub observed_marker: Option<i64>,
    /// Human-readable diagnostics (stderr, parse failure reason, threshold
    /// comparison). Empty for Advanced.
    pub detail: String,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.task.resource_id;
        match self.status {
            OutcomeStatus::Advanced => write!(
                f,
                "{id}: advanced to {} (required {})",
                self.observed_marker.unwrap_or(self.task.min_marker),
                self.task.min_marker
            ),
            OutcomeStatus::NotAdvanced => write!(f, "{id}: not advanced: {}", self.detail),
            OutcomeStatus::ParseError => write!(f, "{id}: parse error: {}", self.detail),
            OutcomeStatus::ProbeFailed => write!(f, "{id}: probe failed: {}", self.detail),
        }
    }
}
