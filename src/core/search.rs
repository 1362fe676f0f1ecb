//! Candidate search strategies
//!
//! A [`ToolSearchSpec`] lists, in priority order, where a tool may live.
//! The resolver walks the list and stops at the first hit; the order of
//! strategies is the only thing that encodes preference.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::defaults::{
    MSBUILD_BIN_FOLDERS, MSBUILD_DIR, MSBUILD_LEGACY_VERSIONS, MSBUILD_MODERN_VERSION,
    PYTHON_EXECUTABLES, VISUAL_STUDIO_DIR, VISUAL_STUDIO_EDITIONS, WINDOWS_PYTHON_DIR,
};
use crate::core::platform::HostEnv;
use crate::core::tool::ToolName;

/// Produces candidate directories from the host environment on demand
pub type CandidateDirs = fn(&HostEnv) -> Vec<PathBuf>;

/// One way of locating a tool
#[derive(Debug, Clone)]
pub enum SearchStrategy {
    /// Search the live `PATH` for `executable`
    Bare { executable: String },
    /// Search a caller-supplied path list for `executable`
    BareIn {
        executable: String,
        search_path: OsString,
    },
    /// Search directories computed from the environment for `executable`
    ///
    /// Directories are only computed when the strategy is reached.
    Constructed {
        executable: String,
        dirs: CandidateDirs,
    },
    /// A fixed path under a vendored root that must exist
    Literal(PathBuf),
}

impl SearchStrategy {
    /// Search `PATH` for a tool's default executable
    pub fn bare(tool: ToolName) -> Self {
        SearchStrategy::Bare {
            executable: tool.executable().to_string(),
        }
    }

    /// Search `search_path` for a tool's default executable
    pub fn bare_in(tool: ToolName, search_path: impl Into<OsString>) -> Self {
        SearchStrategy::BareIn {
            executable: tool.executable().to_string(),
            search_path: search_path.into(),
        }
    }
}

/// Ordered candidate strategies for one tool
#[derive(Debug, Clone)]
pub struct ToolSearchSpec {
    /// Tool being resolved
    pub tool: ToolName,
    /// Strategies in priority order
    pub strategies: Vec<SearchStrategy>,
}

impl ToolSearchSpec {
    /// Create a spec from explicit strategies
    pub fn new(tool: ToolName, strategies: Vec<SearchStrategy>) -> Self {
        Self { tool, strategies }
    }

    /// `PATH` lookup only
    pub fn bare(tool: ToolName) -> Self {
        Self::new(tool, vec![SearchStrategy::bare(tool)])
    }

    /// `PATH` lookup, then the given vendored directory if any
    pub fn with_fallback(tool: ToolName, vendored: Option<&Path>) -> Self {
        let mut strategies = vec![SearchStrategy::bare(tool)];
        if let Some(dir) = vendored {
            strategies.push(SearchStrategy::bare_in(tool, dir.as_os_str()));
        }
        Self::new(tool, strategies)
    }

    /// `PATH`, then the Visual Studio and standalone MsBuild layouts
    pub fn msbuild() -> Self {
        let tool = ToolName::MsBuild;
        Self::new(
            tool,
            vec![
                SearchStrategy::bare(tool),
                SearchStrategy::Constructed {
                    executable: tool.executable().to_string(),
                    dirs: msbuild_candidates,
                },
            ],
        )
    }

    /// Every Python location crossed with every interpreter name
    ///
    /// Locations are `PATH`, `PYTHON`, and on Windows the conventional
    /// install directory. Names are tried in order at each location.
    pub fn python(env: &HostEnv) -> Self {
        let mut locations: Vec<Option<OsString>> = vec![None];
        if let Some(python) = &env.python {
            locations.push(Some(python.clone()));
        }
        if env.platform.is_windows() {
            locations.push(Some(OsString::from(WINDOWS_PYTHON_DIR)));
        }

        let strategies = locations
            .into_iter()
            .flat_map(|location| {
                PYTHON_EXECUTABLES.iter().map(move |name| match &location {
                    None => SearchStrategy::Bare {
                        executable: (*name).to_string(),
                    },
                    Some(search_path) => SearchStrategy::BareIn {
                        executable: (*name).to_string(),
                        search_path: search_path.clone(),
                    },
                })
            })
            .collect();
        Self::new(ToolName::Python, strategies)
    }

    /// Vendored `m4.exe` on Windows, `PATH` elsewhere
    pub fn m4(env: &HostEnv, vendored_root: Option<&Path>) -> Self {
        let tool = ToolName::M4;
        if env.platform.is_windows() {
            let strategies = vendored_root
                .map(|root| SearchStrategy::Literal(root.join("m4.exe")))
                .into_iter()
                .collect();
            Self::new(tool, strategies)
        } else {
            Self::bare(tool)
        }
    }
}

/// Expand install roots into candidate bin directories
///
/// For each root and each edition (priority order) the immediate
/// subdirectories of `<root>/<edition>` are listed, and every bin folder
/// variant is joined under `<subdir>/<tail>`. Roots or editions that cannot
/// be read are skipped. The result is deduplicated, first occurrence wins.
pub fn resolve_constructed_candidates(
    roots: &[PathBuf],
    editions: &[&str],
    tail: &[&str],
    bin_folders: &[&str],
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for root in roots {
        for edition in editions {
            let folder = root.join(edition);
            for dir in list_subdirs(&folder) {
                let base = tail.iter().fold(dir, |path, segment| path.join(segment));
                for bin in bin_folders {
                    candidates.push(join_segments(&base, bin));
                }
            }
        }
    }
    dedupe_paths(candidates)
}

/// Candidate directories for `msbuild.exe`
///
/// Visual Studio 2017-style installs come first, then the three legacy
/// standalone versions, newest first.
pub fn msbuild_candidates(env: &HostEnv) -> Vec<PathBuf> {
    let vs_roots: Vec<PathBuf> = env
        .program_files_roots()
        .into_iter()
        .map(|root| root.join(VISUAL_STUDIO_DIR))
        .collect();
    let mut candidates = resolve_constructed_candidates(
        &vs_roots,
        &VISUAL_STUDIO_EDITIONS,
        &[MSBUILD_DIR, MSBUILD_MODERN_VERSION],
        &MSBUILD_BIN_FOLDERS,
    );

    for version in MSBUILD_LEGACY_VERSIONS {
        if let Some(root) = &env.program_files {
            candidates.push(join_segments(&root.join(MSBUILD_DIR).join(version), "bin/x86"));
        }
        if let Some(root) = &env.program_files_x86 {
            let base = root.join(MSBUILD_DIR).join(version);
            candidates.push(join_segments(&base, "bin"));
            candidates.push(join_segments(&base, "bin/amd64"));
        }
    }
    dedupe_paths(candidates)
}

/// Join a `/`-separated relative path segment by segment
fn join_segments(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

fn list_subdirs(folder: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(folder) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn dedupe_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
