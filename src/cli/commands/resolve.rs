//! CLI command for `toolprobe resolve`
//!
//! Resolves one bundle and prints the path of each of its tools.

use anyhow::Result;

use crate::cli::output::{is_json, is_quiet, print_json, status};
use crate::core::bundle::BundleKind;
use crate::core::resolver::ToolchainRegistry;

/// Execute the resolve command
pub async fn execute(registry: &ToolchainRegistry, bundle: BundleKind) -> Result<()> {
    let roles = registry.resolve_roles(bundle).await?;

    if is_json() {
        return print_json(&serde_json::json!({
            "status": "success",
            "bundle": bundle,
            "platform": registry.env().platform,
            "roles": roles,
        }));
    }

    if is_quiet() {
        return Ok(());
    }

    println!("{} {bundle} ({})", status::SUCCESS, registry.env().platform);
    for role in &roles {
        match &role.value {
            Some(value) => println!("  {:<8} {value}", role.name),
            None => println!("  {:<8} (not present)", role.name),
        }
    }

    Ok(())
}
