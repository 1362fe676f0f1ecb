//! CLI command for `toolprobe doctor`
//!
//! Resolves every bundle and reports missing tools with suggestions.

use anyhow::Result;

use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_json, print_success, print_warning,
    status, verbosity,
};
use crate::core::doctor::run_doctor;
use crate::core::resolver::ToolchainRegistry;

/// Execute the doctor command
pub async fn execute(registry: &ToolchainRegistry) -> Result<()> {
    let report = run_doctor(registry).await;

    // JSON output mode
    if is_json() {
        let status = if report.all_passed() {
            "success"
        } else if report.all_required_passed() {
            "warning"
        } else {
            "error"
        };
        print_json(&serde_json::json!({
            "status": status,
            "platform": registry.env().platform,
            "checks": report.checks,
            "passed_count": report.passed_count(),
            "failed_count": report.failed_count(),
            "total_count": report.checks.len(),
        }))?;

        if !report.all_required_passed() {
            return Err(anyhow::anyhow!("Missing required tools"));
        }
        return Ok(());
    }

    // Quiet mode - only show errors
    if is_quiet() {
        let failed_required = report.failed_required();
        if !failed_required.is_empty() {
            for check in failed_required {
                eprintln!("{} Missing required: {}", status::ERROR, check.name);
            }
            return Err(anyhow::anyhow!("Missing required tools"));
        }
        return Ok(());
    }

    print_info(&format!(
        "Checking toolchains ({})...",
        registry.env().platform
    ));
    println!();

    for check in &report.checks {
        let required_str = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!("  {} {}{required_str}", status::SUCCESS, check.name);
            if verbosity() > 0 {
                for role in &check.roles {
                    let value = role.value.as_deref().unwrap_or("(not present)");
                    print_detail(&format!("{}: {value}", role.name));
                }
            }
        } else {
            println!("  {} {}{required_str}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
    } else if report.all_required_passed() {
        print_warning(&format!(
            "{passed}/{total} checks passed (optional tools missing)"
        ));
    } else {
        println!(
            "{} {passed}/{total} checks passed, {} failed",
            status::ERROR,
            report.failed_count()
        );
        return Err(anyhow::anyhow!(
            "Missing required tools. Run 'toolprobe doctor -v' for details."
        ));
    }

    Ok(())
}
