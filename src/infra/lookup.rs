//! Executable lookup
//!
//! PATH-style lookups go through [`ExecutableLookup`] so the resolver can be
//! driven by a simulated filesystem in tests. [`WhichLookup`] is the real
//! implementation, backed by the `which` crate.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of probing one candidate location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The executable exists at this path
    Found(PathBuf),
    /// Nothing usable at this location
    NotFound,
    /// The lookup itself failed; never treated as a miss
    Error(String),
}

/// A PATH-style executable lookup primitive
pub trait ExecutableLookup: Send + Sync + fmt::Debug {
    /// Search `search_path` (a platform path list) for an executable
    /// literally named `name`
    fn lookup(&self, name: &str, search_path: &OsStr, cwd: &Path) -> LookupOutcome;

    /// Check that a fully joined path names an existing file
    fn check_file(&self, path: &Path) -> LookupOutcome {
        if path.is_file() {
            LookupOutcome::Found(path.to_path_buf())
        } else {
            LookupOutcome::NotFound
        }
    }
}

/// Lookup backed by [`which::which_in`]
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichLookup;

impl ExecutableLookup for WhichLookup {
    fn lookup(&self, name: &str, search_path: &OsStr, cwd: &Path) -> LookupOutcome {
        if search_path.is_empty() {
            return LookupOutcome::NotFound;
        }
        match which::which_in(name, Some(search_path), cwd) {
            Ok(path) => LookupOutcome::Found(path),
            Err(which::Error::CannotFindBinaryPath) => LookupOutcome::NotFound,
            Err(e) => LookupOutcome::Error(e.to_string()),
        }
    }
}
