//! Error types for toolprobe
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::tool::ToolName;

/// Toolchain resolution errors
///
/// A single candidate that misses or fails validation never shows up here;
/// only the final outcome of a resolution crosses this boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Every candidate for a required tool was exhausted
    #[error("{tool} is missing")]
    MandatoryToolMissing { tool: ToolName },

    /// The lookup primitive failed for a reason other than "not found"
    #[error("Unexpected error while looking up {tool}: {reason}")]
    UnexpectedLookup { tool: ToolName, reason: String },
}

impl ResolveError {
    /// The tool this error is about
    pub fn tool(&self) -> ToolName {
        match self {
            ResolveError::MandatoryToolMissing { tool }
            | ResolveError::UnexpectedLookup { tool, .. } => *tool,
        }
    }
}

/// Child process completion errors
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The OS refused to start the process
    #[error("Failed to start '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not exit with code 0
    #[error("Command terminated with exit code {}\n{invocation}", display_code(.code, .signal))]
    NonZeroExit {
        code: Option<i32>,
        signal: Option<i32>,
        invocation: String,
    },

    /// The process did not finish within its time budget
    #[error("Command timed out after {}s\n{invocation}", .timeout.as_secs())]
    TimedOut {
        invocation: String,
        timeout: std::time::Duration,
    },

    /// Reading output or waiting on the process failed
    #[error("I/O error while waiting for '{invocation}': {source}")]
    Io {
        invocation: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Exit code of a process that terminated unsuccessfully
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}

fn display_code(code: &Option<i32>, signal: &Option<i32>) -> String {
    match (*code, *signal) {
        (Some(code), _) => code.to_string(),
        (None, Some(signal)) => format!("null (signal {signal})"),
        (None, None) => "null".to_string(),
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse or serialize the config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}
