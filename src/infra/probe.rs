//! Interpreter version probing
//!
//! The resolver asks each candidate interpreter for its version through
//! [`VersionProbe`]. [`CommandVersionProbe`] runs the candidate with a
//! version flag under a timeout and returns stdout and stderr combined.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::defaults::{PYTHON_VERSION_ARG, PYTHON_VERSION_TIMEOUT};
use crate::error::ProcessError;
use crate::infra::process::{shared_output, CompletionOptions, Invocation, StdioMode};

/// Asks an executable to report its version
#[async_trait]
pub trait VersionProbe: Send + Sync + std::fmt::Debug {
    /// Combined stdout and stderr of the version query
    async fn version_output(&self, executable: &Path) -> Result<String, ProcessError>;
}

/// Runs `<executable> --version` as a child process
#[derive(Debug, Clone)]
pub struct CommandVersionProbe {
    arg: String,
    timeout: Duration,
}

impl CommandVersionProbe {
    /// Create a probe with a custom flag and timeout
    pub fn new(arg: impl Into<String>, timeout: Duration) -> Self {
        Self {
            arg: arg.into(),
            timeout,
        }
    }
}

impl Default for CommandVersionProbe {
    fn default() -> Self {
        Self::new(PYTHON_VERSION_ARG, PYTHON_VERSION_TIMEOUT)
    }
}

#[async_trait]
impl VersionProbe for CommandVersionProbe {
    async fn version_output(&self, executable: &Path) -> Result<String, ProcessError> {
        let invocation = Invocation::new(executable)
            .arg(&self.arg)
            .stdio(StdioMode::Piped)
            .kill_on_drop(true);
        let output = shared_output();

        tokio::time::timeout(
            self.timeout,
            invocation.run(CompletionOptions::capture(output.clone())),
        )
        .await
        .map_err(|_| ProcessError::TimedOut {
            invocation: invocation.command_line(),
            timeout: self.timeout,
        })??;

        let output = output
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(format!("{}{}", output.stdout, output.stderr))
    }
}
