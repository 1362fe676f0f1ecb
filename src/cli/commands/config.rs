//! CLI command for `toolprobe config`
//!
//! Prints the configuration the other commands would resolve with.

use anyhow::Result;
use std::path::Path;

use crate::cli::output::{is_json, is_quiet, print_json};
use crate::config::settings::ToolchainConfig;
use crate::infra::dirs::ToolprobeDirs;

/// Execute the config command
pub fn execute(
    config_path: &Path,
    config: &ToolchainConfig,
    dirs: &ToolprobeDirs,
) -> Result<()> {
    let output_dir = config.output_dir(dirs);

    if is_json() {
        return print_json(&serde_json::json!({
            "config_path": config_path,
            "config_exists": config_path.exists(),
            "output_dir": output_dir,
            "config": config,
        }));
    }

    if is_quiet() {
        return Ok(());
    }

    let origin = if config_path.exists() {
        ""
    } else {
        " (not found, using defaults)"
    };
    println!("Config file: {}{origin}", config_path.display());
    println!("Output dir:  {}", output_dir.display());
    println!();
    println!("[third_party]");
    print_entry("m4", config.third_party.m4.as_deref());
    print_entry("emscripten", config.third_party.emscripten.as_deref());
    println!();
    println!("[bin_dirs]");
    print_entry("spec", config.bin_dirs.spec.as_deref());
    print_entry("csmith", config.bin_dirs.csmith.as_deref());
    print_entry("llvm", config.bin_dirs.llvm.as_deref());

    Ok(())
}

fn print_entry(key: &str, value: Option<&Path>) {
    match value {
        Some(path) => println!("{key} = {}", path.display()),
        None => println!("{key} = (unset)"),
    }
}
