//! Host platform and environment snapshot
//!
//! Every platform-dependent decision the resolver makes reads from a
//! [`HostEnv`] instead of the live process environment, so a Windows host
//! can be simulated on any machine.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::defaults::{
    ENV_PATH, ENV_PROGRAM_FILES, ENV_PROGRAM_FILES_X86, ENV_PYTHON,
};

/// Host operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Microsoft Windows
    Windows,
    /// Linux, macOS and every other Unix-like host
    Unix,
}

impl Platform {
    /// Whether this is a Windows host
    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Unix => write!(f, "unix"),
        }
    }
}

/// Detect the current host platform
pub fn detect_platform() -> Platform {
    if cfg!(windows) {
        Platform::Windows
    } else {
        Platform::Unix
    }
}

/// Snapshot of the environment inputs used during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// Operating system family
    pub platform: Platform,
    /// Value of `PATH`
    pub path: Option<OsString>,
    /// Value of `ProgramFiles`
    pub program_files: Option<PathBuf>,
    /// Value of `ProgramFiles(x86)`
    pub program_files_x86: Option<PathBuf>,
    /// Value of `PYTHON`, used as an extra interpreter search path
    pub python: Option<OsString>,
    /// Directory relative lookups are resolved against
    pub cwd: PathBuf,
}

impl HostEnv {
    /// Capture the environment of the running process
    pub fn capture() -> Self {
        Self {
            platform: detect_platform(),
            path: env::var_os(ENV_PATH),
            program_files: env::var_os(ENV_PROGRAM_FILES).map(PathBuf::from),
            program_files_x86: env::var_os(ENV_PROGRAM_FILES_X86).map(PathBuf::from),
            python: env::var_os(ENV_PYTHON),
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// An empty environment for the given platform
    ///
    /// Nothing is on `PATH` and no install roots are known.
    pub fn empty(platform: Platform) -> Self {
        Self {
            platform,
            path: None,
            program_files: None,
            program_files_x86: None,
            python: None,
            cwd: PathBuf::from("."),
        }
    }

    /// Set the `PATH` value
    #[must_use]
    pub fn with_path(mut self, path: impl Into<OsString>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the `ProgramFiles` and `ProgramFiles(x86)` roots
    #[must_use]
    pub fn with_program_files(
        mut self,
        program_files: Option<PathBuf>,
        program_files_x86: Option<PathBuf>,
    ) -> Self {
        self.program_files = program_files;
        self.program_files_x86 = program_files_x86;
        self
    }

    /// Set the `PYTHON` search path
    #[must_use]
    pub fn with_python(mut self, python: impl Into<OsString>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Set the working directory
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// The "Program Files"-class roots that are set, in priority order
    pub fn program_files_roots(&self) -> Vec<PathBuf> {
        [&self.program_files, &self.program_files_x86]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

impl Default for HostEnv {
    fn default() -> Self {
        Self::capture()
    }
}
