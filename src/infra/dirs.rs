//! Platform-specific directory management
//!
//! Provides platform-specific paths for the config file and for the
//! scratch output directory handed to Emscripten as its home.
//!
//! Environment variables can override default locations:
//! - `TOOLPROBE_CONFIG` - Override the config file path
//! - `TOOLPROBE_CONFIG_DIR` - Override config directory
//! - `TOOLPROBE_CACHE_DIR` - Override cache directory

use std::env;
use std::path::PathBuf;

/// Environment variable names for location overrides
pub const ENV_CONFIG_PATH: &str = "TOOLPROBE_CONFIG";
pub const ENV_CONFIG_DIR: &str = "TOOLPROBE_CONFIG_DIR";
pub const ENV_CACHE_DIR: &str = "TOOLPROBE_CACHE_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "toolprobe";

/// Subdirectory for build-scoped output
const OUTPUT_SUBDIR: &str = "output";

/// Platform-specific directory provider for toolprobe
#[derive(Debug, Clone)]
pub struct ToolprobeDirs {
    config_path: Option<PathBuf>,
    config_dir: PathBuf,
    cache_dir: PathBuf,
}

impl ToolprobeDirs {
    /// Create a new `ToolprobeDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_path: env::var_os(ENV_CONFIG_PATH).map(PathBuf::from),
            config_dir: env::var_os(ENV_CONFIG_DIR)
                .map_or_else(Self::platform_config_dir, PathBuf::from),
            cache_dir: env::var_os(ENV_CACHE_DIR)
                .map_or_else(Self::platform_cache_dir, PathBuf::from),
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/toolprobe` or `~/.config/toolprobe`
    /// - macOS: `~/Library/Application Support/toolprobe`
    /// - Windows: `%APPDATA%\toolprobe`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the cache directory path
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    /// Get the config file path
    ///
    /// `TOOLPROBE_CONFIG` wins over `config.toml` in the config directory.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.config_dir.join("config.toml"))
    }

    /// Default build-scoped output directory
    ///
    /// Used as the redirected home of Emscripten runs when the config does
    /// not name one.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.cache_dir.join(OUTPUT_SUBDIR)
    }

    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }

    fn platform_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".cache").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".cache").join(APP_NAME))
            })
    }
}

impl Default for ToolprobeDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_new_creates_instance() {
        let dirs = ToolprobeDirs::new();
        assert!(!dirs.config_dir().as_os_str().is_empty());
        assert!(!dirs.cache_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_output_dir_is_under_cache_dir() {
        let dirs = ToolprobeDirs::new();
        assert!(dirs.output_dir().starts_with(dirs.cache_dir()));
    }

    #[test]
    fn test_config_path_defaults_under_config_dir() {
        let dirs = ToolprobeDirs {
            config_path: None,
            config_dir: PathBuf::from("/etc/toolprobe"),
            cache_dir: PathBuf::from("/var/cache/toolprobe"),
        };
        assert_eq!(
            dirs.config_path(),
            PathBuf::from("/etc/toolprobe").join("config.toml")
        );
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let dirs = ToolprobeDirs {
            config_path: Some(PathBuf::from("/tmp/custom.toml")),
            config_dir: PathBuf::from("/etc/toolprobe"),
            cache_dir: PathBuf::from("/var/cache/toolprobe"),
        };
        assert_eq!(dirs.config_path(), PathBuf::from("/tmp/custom.toml"));
    }
}
