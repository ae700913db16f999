use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// One external program call: a program name and its argument vector.
/// Never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success {
        stdout: String,
    },
    /// `exit_code` is `None` when the process could not be spawned or was
    /// killed by a signal.
    Failure {
        exit_code: Option<i32>,
        stderr: String,
    },
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation to completion. Exactly one attempt, no retries.
    async fn run(&self, invocation: &Invocation) -> ProcessOutcome;
}

/// Runs invocations as real child processes on the tokio runtime.
///
/// The child is killed if the future awaiting it is dropped, so an aborted
/// request does not leave a transcoder running.
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> ProcessOutcome {
        info!("⚙️ Spawning: {}", invocation);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let output = match output {
            Ok(o) => o,
            Err(e) => {
                warn!("Failed to spawn {}: {}", invocation.program, e);
                return ProcessOutcome::Failure {
                    exit_code: None,
                    stderr: format!("failed to spawn {}: {}", invocation.program, e),
                };
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            debug!("{} exited successfully ({} bytes of stdout)", invocation.program, stdout.len());
            ProcessOutcome::Success { stdout }
        } else {
            warn!("{} exited with {}", invocation.program, output.status);
            ProcessOutcome::Failure {
                exit_code: output.status.code(),
                stderr,
            }
        }
    }
}
