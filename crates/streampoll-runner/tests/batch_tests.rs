//! Integration tests for the batch coordinator, against real probe
//! processes (small /bin/sh scripts written into a tempdir).

#![cfg(unix)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use streampoll_core::model::{Outcome, OutcomeStatus, ResourceTask};
use streampoll_runner::{run_batch, BatchOptions, ProbeCommand};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn task(id: &str, min_marker: i64) -> ResourceTask {
    ResourceTask {
        resource_id: id.into(),
        min_marker,
    }
}

async fn collect(mut rx: tokio::sync::mpsc::UnboundedReceiver<Outcome>) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

#[tokio::test]
async fn every_task_yields_exactly_one_outcome() {
    let dir = tempfile::tempdir().unwrap();
    // Echoes "height <id>", so numeric ids double as observed markers.
    let script = write_script(dir.path(), "probe.sh", r#"echo "height $1""#);

    let tasks = vec![task("10", 10), task("20", 20), task("30", 31)];
    let rx = run_batch(
        ProbeCommand::new(script.to_string_lossy(), vec![]),
        tasks.clone(),
        BatchOptions::default(),
    );
    let outcomes = collect(rx).await;

    assert_eq!(outcomes.len(), tasks.len());
    let mut ids: Vec<&str> = outcomes.iter().map(|o| o.task.resource_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["10", "20", "30"]);
}

#[tokio::test]
async fn mixed_statuses_in_one_batch() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "probe.sh",
        r#"case "$1" in
ok) echo "diag line"; echo "height 42" ;;
behind) echo "height 10" ;;
junk) echo "nonsense" ;;
bad) echo "boom" >&2; exit 3 ;;
esac"#,
    );

    let tasks = vec![
        task("ok", 42),
        task("behind", 42),
        task("junk", 42),
        task("bad", 42),
    ];
    let rx = run_batch(
        ProbeCommand::new(script.to_string_lossy(), vec![]),
        tasks,
        BatchOptions::default(),
    );
    let outcomes = collect(rx).await;
    let by_id: HashMap<&str, &Outcome> = outcomes
        .iter()
        .map(|o| (o.task.resource_id.as_str(), o))
        .collect();

    assert_eq!(by_id["ok"].status, OutcomeStatus::Advanced);
    assert_eq!(by_id["ok"].observed_marker, Some(42));

    assert_eq!(by_id["behind"].status, OutcomeStatus::NotAdvanced);
    assert_eq!(by_id["behind"].observed_marker, Some(10));

    assert_eq!(by_id["junk"].status, OutcomeStatus::ParseError);
    assert_eq!(by_id["junk"].detail, "insufficient tokens");

    assert_eq!(by_id["bad"].status, OutcomeStatus::ProbeFailed);
    assert!(by_id["bad"].detail.contains("boom"));
}

#[tokio::test]
async fn spawn_failure_is_isolated_to_its_task() {
    let rx = run_batch(
        ProbeCommand::new("/nonexistent/streampoll-probe", vec![]),
        vec![task("a", 1), task("b", 2)],
        BatchOptions::default(),
    );
    let outcomes = collect(rx).await;

    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes {
        assert_eq!(outcome.status, OutcomeStatus::ProbeFailed);
        assert!(!outcome.detail.is_empty());
    }
}

#[tokio::test]
async fn slow_probe_does_not_delay_other_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "probe.sh",
        r#"if [ "$1" = "slow" ]; then sleep 3; fi
echo "height 5""#,
    );

    let mut rx = run_batch(
        ProbeCommand::new(script.to_string_lossy(), vec![]),
        vec![task("slow", 5), task("fast-1", 5), task("fast-2", 5)],
        BatchOptions::default(),
    );

    // Both fast outcomes must surface while the slow probe is still asleep.
    for _ in 0..2 {
        let outcome = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("fast outcome blocked behind slow probe")
            .expect("channel closed early");
        assert!(outcome.task.resource_id.starts_with("fast-"));
        assert_eq!(outcome.status, OutcomeStatus::Advanced);
    }

    let slow = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("slow outcome never arrived")
        .expect("channel closed early");
    assert_eq!(slow.task.resource_id, "slow");
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn timeout_becomes_probe_failed() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "probe.sh", r#"sleep 5; echo "height 1""#);

    let probe = ProbeCommand::new(script.to_string_lossy(), vec![])
        .with_timeout(Some(Duration::from_millis(300)));
    let rx = run_batch(probe, vec![task("hung", 1)], BatchOptions::default());
    let outcomes = collect(rx).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status, OutcomeStatus::ProbeFailed);
    assert!(outcomes[0].detail.contains("timed out"), "detail: {}", outcomes[0].detail);
}

#[tokio::test]
async fn concurrency_ceiling_still_completes_every_task() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "probe.sh", r#"echo "height $1""#);

    let tasks: Vec<ResourceTask> = (1..=8).map(|n| task(&n.to_string(), n)).collect();
    let rx = run_batch(
        ProbeCommand::new(script.to_string_lossy(), vec![]),
        tasks,
        BatchOptions {
            max_concurrent: Some(2),
        },
    );
    let outcomes = collect(rx).await;

    assert_eq!(outcomes.len(), 8);
    assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Advanced));
}
