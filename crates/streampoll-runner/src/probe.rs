use std::process::Stdio;
use std::time::Duration;

use streampoll_core::model::ProbeResult;
use thiserror::Error;

/// Placeholder in probe argument templates replaced by the stream id.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Why a probe produced no [`ProbeResult`].
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe process could not be started or waited on.
    #[error("failed to run probe: {0}")]
    Spawn(#[from] std::io::Error),
    /// The optional per-probe deadline elapsed before the probe exited.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
}

/// External probe command template: program plus argument vector.
///
/// The stream id is substituted for any `{id}` placeholder in the arguments;
/// when no placeholder is present it is appended as the final argument.
/// Arguments go straight to the process-creation primitive; no shell is
/// involved.
#[derive(Debug, Clone)]
pub struct ProbeCommand {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProbeCommand {
    /// Build a template with no timeout: a hung probe stalls only its own
    /// worker.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Set an optional per-probe deadline. A timed-out probe is killed and
    /// reported as a failure for its task only.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn argv(&self, resource_id: &str) -> Vec<String> {
        if self.args.iter().any(|a| a.contains(ID_PLACEHOLDER)) {
            self.args
                .iter()
                .map(|a| a.replace(ID_PLACEHOLDER, resource_id))
                .collect()
        } else {
            let mut args = self.args.clone();
            args.push(resource_id.to_string());
            args
        }
    }

    /// Run the probe once for `resource_id`, collecting its full stdout,
    /// stderr, and exit code. Output is assumed to be small diagnostic text,
    /// so it is not streamed.
    pub async fn run(&self, resource_id: &str) -> Result<ProbeResult, ProbeError> {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(self.argv(resource_id))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| ProbeError::Timeout(limit))??,
            None => command.output().await?,
        };

        Ok(ProbeResult {
            // Signal termination has no exit code; fold it into failure.
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
