//! Turns one raw probe result into a terminal [`Outcome`].
//!
//! The probe's contract is deliberately loose: exit 0 means the response is
//! trustworthy, and the last line of stdout is a status summary whose second
//! whitespace-delimited field is the stream's current progress marker. Any
//! free text before that line is ignored.

use crate::model::{Outcome, OutcomeStatus, ProbeResult, ResourceTask};

/// Evaluate one probe result against the task's required marker.
///
/// Pure: the same inputs always produce an identical outcome. Failures are
/// encoded in the returned status, never raised.
pub fn evaluate(task: ResourceTask, result: ProbeResult) -> Outcome {
    if result.exit_code != 0 {
        return Outcome {
            task,
            status: OutcomeStatus::ProbeFailed,
            observed_marker: None,
            detail: result.stderr.trim_end().to_string(),
        };
    }

    let trimmed = result.stdout.trim_end();
    let Some(line) = trimmed.lines().next_back() else {
        return parse_error(task, "no output");
    };

    let mut tokens = line.split_whitespace();
    let (Some(_first), Some(second)) = (tokens.next(), tokens.next()) else {
        return parse_error(task, "insufficient tokens");
    };

    let Ok(observed) = second.parse::<i64>() else {
        return parse_error(task, "non-integer marker");
    };

    if observed >= task.min_marker {
        Outcome {
            task,
            status: OutcomeStatus::Advanced,
            observed_marker: Some(observed),
            detail: String::new(),
        }
    } else {
        let detail = format!("observed {observed} < required {}", task.min_marker);
        Outcome {
            task,
            status: OutcomeStatus::NotAdvanced,
            observed_marker: Some(observed),
            detail,
        }
    }
}

fn parse_error(task: ResourceTask, detail: &str) -> Outcome {
    Outcome {
        task,
        status: OutcomeStatus::ParseError,
        observed_marker: None,
        detail: detail.to_string(),
    }
}
