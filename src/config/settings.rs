//! Toolchain configuration
//!
//! Reads the locations of vendored third-party tools from `config.toml`.
//! These are supplied by the surrounding build system; toolprobe never
//! searches for them.
//!
//! ```toml
//! output_dir = "/work/out"
//!
//! [third_party]
//! m4 = "/work/third_party/m4"
//! emscripten = "/work/third_party/emscripten"
//!
//! [bin_dirs]
//! spec = "/work/third_party/spec/interpreter"
//! csmith = "/work/build/csmith/src"
//! llvm = "/work/build/llvm/bin"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::infra::dirs::ToolprobeDirs;

/// Toolchain configuration for toolprobe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Build-scoped output directory, used as Emscripten's home
    pub output_dir: Option<PathBuf>,

    /// Vendored tool roots
    #[serde(default)]
    pub third_party: ThirdPartyConfig,

    /// Directories holding tools built from vendored sources
    #[serde(default)]
    pub bin_dirs: BinDirsConfig,
}

/// Vendored third-party tool roots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPartyConfig {
    /// Bundled m4 (holds `m4.exe` on Windows)
    pub m4: Option<PathBuf>,

    /// Emscripten checkout (holds `emcc.py` and `em++.py`)
    pub emscripten: Option<PathBuf>,
}

/// Output directories of vendored tool builds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinDirsConfig {
    /// Spec interpreter build output (holds `wasm`)
    pub spec: Option<PathBuf>,

    /// Csmith build output
    pub csmith: Option<PathBuf>,

    /// LLVM build output (holds `clang`)
    pub llvm: Option<PathBuf>,
}

impl ToolchainConfig {
    /// Load configuration from the location given by `dirs`
    ///
    /// A missing file yields the default configuration.
    pub fn load(dirs: &ToolprobeDirs) -> Result<Self, ConfigError> {
        Self::load_from_path(&dirs.config_path())
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if the file exists but is not
    /// valid TOML for this schema.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError {
                path: parent.display().to_string(),
                error: e.to_string(),
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        fs::write(path, content).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Get the effective output directory
    ///
    /// Falls back to the platform cache location when unset.
    #[must_use]
    pub fn output_dir(&self, dirs: &ToolprobeDirs) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| dirs.output_dir())
    }
}
