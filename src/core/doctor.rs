//! Doctor logic
//!
//! Resolves every bundle against one registry and reports what was found,
//! what is missing, and how to fix it.

use serde::Serialize;

use crate::core::bundle::{BundleKind, Role};
use crate::core::resolver::ToolchainRegistry;
use crate::core::tool::ToolName;
use crate::error::ResolveError;

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Name of the bundle or tool being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Resolved roles when the check passed
    pub roles: Vec<Role>,
    /// Error message if the check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
    /// Whether a failure blocks the pipeline
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, roles: Vec<Role>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            roles,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            roles: Vec::new(),
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Check if all checks passed (including optional)
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Count failed checks
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// How to make a missing tool resolvable
pub fn install_hint(tool: ToolName) -> &'static str {
    match tool {
        ToolName::MsBuild => "Install Visual Studio 2017 or the Build Tools for Visual Studio",
        ToolName::CMake => "Install CMake from https://cmake.org/download/ and add it to PATH",
        ToolName::M4 => "Install m4 with your package manager, or set third_party.m4 on Windows",
        ToolName::Make => "Install make with your package manager",
        ToolName::Python => "Install Python 2.7 and add it to PATH, or set PYTHON",
        ToolName::Clang => "Build the vendored LLVM or install clang (optional)",
        ToolName::Csmith => "Build the vendored csmith or install it (optional)",
        ToolName::Wasm => "Build the spec interpreter or install it (optional)",
        ToolName::Emcc | ToolName::Empp => {
            "Set third_party.emscripten to a checkout containing emcc.py and em++.py"
        }
    }
}

fn check_bundle(kind: BundleKind, result: Result<Vec<Role>, ResolveError>) -> CheckResult {
    match result {
        Ok(roles) => CheckResult::pass(kind.name(), roles, true),
        Err(e) => {
            let hint = install_hint(e.tool());
            CheckResult::fail(kind.name(), &e.to_string(), Some(hint), true)
        }
    }
}

/// Optional members of the generate bundle that were not found
fn check_optional_roles(roles: &[Role]) -> Vec<CheckResult> {
    [ToolName::Wasm, ToolName::Csmith, ToolName::Clang]
        .into_iter()
        .filter(|tool| {
            roles
                .iter()
                .any(|role| role.name == tool.role() && role.value.is_none())
        })
        .map(|tool| {
            CheckResult::fail(
                &tool.to_string(),
                &format!("{tool} not found"),
                Some(install_hint(tool)),
                false,
            )
        })
        .collect()
}

/// Run all doctor checks
pub async fn run_doctor(registry: &ToolchainRegistry) -> DoctorReport {
    let mut report = DoctorReport::new();

    for kind in BundleKind::ALL {
        let result = registry.resolve_roles(kind).await;
        let optional = match (&result, kind) {
            (Ok(roles), BundleKind::Generate) => check_optional_roles(roles),
            _ => Vec::new(),
        };
        report.add_check(check_bundle(kind, result));
        for check in optional {
            report.add_check(check);
        }
    }

    report
}
