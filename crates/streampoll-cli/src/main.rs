#![forbid(unsafe_code)]

//! streampoll: probe a set of streams concurrently and report which have
//! reached their required progress marker.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use streampoll_core::input::parse_tasks;
use streampoll_runner::{run_batch, BatchOptions, ProbeCommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "streampoll",
    version,
    about = "Poll streams until they reach a required progress marker"
)]
struct Cli {
    /// Input file: one "stream_id min_marker" record per line.
    input: PathBuf,

    /// Probe program to run once per stream.
    #[arg(long)]
    probe: String,

    /// Argument for the probe (repeatable). Any `{id}` is replaced by the
    /// stream id; without a placeholder the id is appended last.
    #[arg(long = "probe-arg")]
    probe_args: Vec<String>,

    /// Cap on simultaneously running probes (default: all at once).
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Per-probe timeout in seconds (default: none).
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit outcomes as JSON lines instead of human-readable text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input file {}", cli.input.display()))?;
    let tasks = parse_tasks(&text);
    if tasks.is_empty() {
        warn!("no tasks found in {}", cli.input.display());
        return Ok(());
    }

    let probe = ProbeCommand::new(cli.probe, cli.probe_args)
        .with_timeout(cli.timeout_secs.map(Duration::from_secs));

    let total = tasks.len();
    info!(total, "starting batch");

    let mut rx = run_batch(
        probe,
        tasks,
        BatchOptions {
            max_concurrent: cli.max_concurrent,
        },
    );
    let mut done = 0usize;
    while let Some(outcome) = rx.recv().await {
        done += 1;
        if cli.json {
            println!("{}", serde_json::to_string(&outcome)?);
        } else {
            println!("{outcome}");
        }
    }
    info!(done, total, "batch finished");

    // Individual outcomes never fail the process; only input errors do.
    Ok(())
}
