//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod config;
pub mod doctor;
pub mod resolve;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Subcommand;

use crate::config::settings::ToolchainConfig;
use crate::core::bundle::BundleKind;
use crate::core::platform::HostEnv;
use crate::core::resolver::ToolchainRegistry;
use crate::infra::dirs::ToolprobeDirs;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve one bundle and print its tools
    Resolve {
        /// Bundle to resolve
        #[arg(value_enum)]
        bundle: BundleKind,
    },

    /// Check every toolchain and report what is missing
    Doctor,

    /// Show the effective configuration
    Config,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, config_path: Option<&Path>) -> Result<()> {
        let dirs = ToolprobeDirs::new();
        let config = match config_path {
            Some(path) => ToolchainConfig::load_from_path(path)?,
            None => ToolchainConfig::load(&dirs)?,
        };
        let config_path = config_path.map_or_else(|| dirs.config_path(), Path::to_path_buf);

        match self {
            Self::Resolve { bundle } => {
                let registry = build_registry(&dirs, config);
                resolve::execute(&registry, bundle).await
            }
            Self::Doctor => {
                let registry = build_registry(&dirs, config);
                doctor::execute(&registry).await
            }
            Self::Config => config::execute(&config_path, &config, &dirs),
        }
    }
}

fn build_registry(dirs: &ToolprobeDirs, config: ToolchainConfig) -> ToolchainRegistry {
    let output_dir: PathBuf = config.output_dir(dirs);
    tracing::debug!("Emscripten home: {}", output_dir.display());
    ToolchainRegistry::new(HostEnv::capture(), config, output_dir)
}
