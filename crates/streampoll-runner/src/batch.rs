use std::sync::Arc;

use streampoll_core::model::{Outcome, OutcomeStatus, ResourceTask};
use streampoll_core::validate;
use tokio::sync::{mpsc, Semaphore};
use tracing::debug;

use crate::probe::ProbeCommand;

/// Fan-out settings.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Cap on simultaneously running probes. `None` launches every probe at
    /// once.
    pub max_concurrent: Option<usize>,
}

/// Launch one probe per task and stream outcomes back in completion order.
///
/// Every submitted task yields exactly one outcome: probe spawn failures,
/// timeouts, non-zero exits, and unparseable output are all converted to
/// outcomes at the task boundary and never disturb the other in-flight
/// probes. The returned receiver closes once all outcomes are delivered.
pub fn run_batch(
    probe: ProbeCommand,
    tasks: Vec<ResourceTask>,
    opts: BatchOptions,
) -> mpsc::UnboundedReceiver<Outcome> {
    let (tx, rx) = mpsc::unbounded_channel();
    let probe = Arc::new(probe);
    let limit = opts
        .max_concurrent
        .map(|n| Arc::new(Semaphore::new(n.max(1))));

    for task in tasks {
        let tx = tx.clone();
        let probe = Arc::clone(&probe);
        let limit = limit.clone();
        tokio::spawn(async move {
            let _permit = match &limit {
                Some(sem) => sem.acquire().await.ok(),
                None => None,
            };
            debug!(stream = %task.resource_id, "probing");
            let outcome = match probe.run(&task.resource_id).await {
                Ok(result) => validate::evaluate(task, result),
                Err(e) => Outcome {
                    status: OutcomeStatus::ProbeFailed,
                    observed_marker: None,
                    detail: e.to_string(),
                    task,
                },
            };
            // Receiver may be gone if the caller stopped consuming early.
            let _ = tx.send(outcome);
        });
    }

    rx
}
