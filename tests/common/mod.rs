//! Common test utilities and helpers
//!
//! This module provides a simulated filesystem lookup, a scripted version
//! probe, and temporary directory helpers for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use toolprobe::config::settings::ToolchainConfig;
use toolprobe::core::platform::{HostEnv, Platform};
use toolprobe::core::resolver::ToolchainRegistry;
use toolprobe::error::ProcessError;
use toolprobe::infra::lookup::{ExecutableLookup, LookupOutcome};
use toolprobe::infra::probe::VersionProbe;

/// Lookup over a fixed set of "installed" executable paths
///
/// Every call is counted so tests can assert how often the filesystem was
/// consulted.
#[derive(Debug, Default)]
pub struct FakeLookup {
    installed: Mutex<HashSet<PathBuf>>,
    failing: Mutex<HashSet<String>>,
    probes: AtomicUsize,
}

impl FakeLookup {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark a full executable path as present
    pub fn install(&self, path: impl Into<PathBuf>) {
        self.installed.lock().unwrap().insert(path.into());
    }

    /// Make every lookup of `name` fail unexpectedly
    pub fn fail_on(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    /// Number of lookups performed so far
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl ExecutableLookup for FakeLookup {
    fn lookup(&self, name: &str, search_path: &OsStr, _cwd: &Path) -> LookupOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(name) {
            return LookupOutcome::Error(format!("permission denied reading {name}"));
        }
        let installed = self.installed.lock().unwrap();
        std::env::split_paths(search_path)
            .map(|dir| dir.join(name))
            .find(|candidate| installed.contains(candidate))
            .map_or(LookupOutcome::NotFound, LookupOutcome::Found)
    }

    fn check_file(&self, path: &Path) -> LookupOutcome {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.installed.lock().unwrap().contains(path) {
            LookupOutcome::Found(path.to_path_buf())
        } else {
            LookupOutcome::NotFound
        }
    }
}

/// Version probe answering from a fixed table of outputs
#[derive(Debug, Default)]
pub struct FakeVersionProbe {
    outputs: Mutex<HashMap<PathBuf, String>>,
    calls: AtomicUsize,
}

impl FakeVersionProbe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script the `--version` output of `executable`
    pub fn answer(&self, executable: impl Into<PathBuf>, output: &str) {
        self.outputs
            .lock()
            .unwrap()
            .insert(executable.into(), output.to_string());
    }

    /// Number of version queries performed so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionProbe for FakeVersionProbe {
    async fn version_output(&self, executable: &Path) -> Result<String, ProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outputs
            .lock()
            .unwrap()
            .get(executable)
            .cloned()
            .ok_or_else(|| ProcessError::Spawn {
                program: executable.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}

/// Platform path list from directories
pub fn path_list(dirs: &[&str]) -> std::ffi::OsString {
    std::env::join_paths(dirs).expect("Invalid path list")
}

/// Environment with the given platform and `PATH`, nothing else set
pub fn host(platform: Platform, path: &[&str]) -> HostEnv {
    HostEnv::empty(platform)
        .with_path(path_list(path))
        .with_cwd("/work")
}

/// Registry wired to fakes
pub fn registry(
    env: HostEnv,
    config: ToolchainConfig,
    lookup: &Arc<FakeLookup>,
    probe: &Arc<FakeVersionProbe>,
) -> ToolchainRegistry {
    ToolchainRegistry::new(env, config, PathBuf::from("/out"))
        .with_lookup(lookup.clone())
        .with_version_probe(probe.clone())
}

/// Temporary directory tree for tests that touch the real filesystem
pub struct TestDir {
    pub dir: TempDir,
}

impl TestDir {
    /// Create a new temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path of the directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file, with parents, and return its path
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Create a directory, with parents, and return its path
    pub fn create_dir(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    /// Create an executable shell script
    #[cfg(unix)]
    pub fn create_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.create_file(name, &format!("#!/bin/sh\n{body}\n"));
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat script")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
        path
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
