//! External chart engine invocation.
//!
//! Every call spawns one engine process, waits for it under a wall-clock
//! timeout and captures its output. The child is spawned with `kill_on_drop`,
//! so it is killed and reaped on every exit path, including a timeout or a
//! dropped request future.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::config::EngineConfig;

/// Captured result of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The report text, or `EngineError::Failed` carrying stderr for a non-zero exit.
    pub fn into_report(self) -> Result<String, EngineError> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(EngineError::Failed {
                exit_code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

/// Failure to obtain a report from the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to launch engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine exited with status {exit_code:?}: {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle for launching the configured engine.
#[derive(Debug, Clone)]
pub struct ChartEngine {
    config: EngineConfig,
}

impl ChartEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the engine with `args` appended to the configured base arguments.
    ///
    /// A non-zero exit is not an error here; see [`EngineOutput::into_report`].
    pub async fn invoke(&self, args: &[String]) -> Result<EngineOutput, EngineError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        tracing::info!(
            program = %self.config.program,
            args = ?args,
            timeout_secs = self.config.timeout.as_secs_f64(),
            "Invoking chart engine"
        );
        let started = Instant::now();

        let child = command.spawn().map_err(|source| {
            tracing::error!(program = %self.config.program, error = %source, "Failed to spawn chart engine");
            EngineError::Spawn {
                program: self.config.program.clone(),
                source,
            }
        })?;

        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        {
            Ok(result) => result?,
            Err(_) => {
                tracing::error!(
                    program = %self.config.program,
                    timeout_secs = self.config.timeout.as_secs_f64(),
                    "Chart engine timed out, killing process"
                );
                return Err(EngineError::Timeout(self.config.timeout));
            }
        };

        let result = EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        };

        if result.success() {
            tracing::info!(
                exit_code = ?result.exit_code,
                stdout_bytes = output.stdout.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Chart engine finished"
            );
        } else {
            tracing::warn!(
                exit_code = ?result.exit_code,
                stderr_bytes = output.stderr.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Chart engine exited unsuccessfully"
            );
        }

        Ok(result)
    }
}
