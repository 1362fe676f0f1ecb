//! Logical tool identifiers
//!
//! The resolver only ever looks up tools from this closed set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical external tool the build pipeline depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolName {
    /// Microsoft Build Engine (Windows only)
    MsBuild,
    /// CMake build-system generator
    CMake,
    /// GNU m4 macro processor
    M4,
    /// GNU make
    Make,
    /// Python 2 interpreter
    Python,
    /// clang C compiler
    Clang,
    /// csmith random program generator
    Csmith,
    /// WebAssembly spec interpreter
    Wasm,
    /// Emscripten C compiler entry point
    Emcc,
    /// Emscripten C++ compiler entry point
    Empp,
}

impl ToolName {
    /// Every known tool, in declaration order
    pub const ALL: [ToolName; 10] = [
        ToolName::MsBuild,
        ToolName::CMake,
        ToolName::M4,
        ToolName::Make,
        ToolName::Python,
        ToolName::Clang,
        ToolName::Csmith,
        ToolName::Wasm,
        ToolName::Emcc,
        ToolName::Empp,
    ];

    /// Name of the executable file searched for on a PATH-style lookup
    pub fn executable(self) -> &'static str {
        match self {
            ToolName::MsBuild => "msbuild.exe",
            ToolName::CMake => "cmake",
            ToolName::M4 => "m4",
            ToolName::Make => "make",
            ToolName::Python => "python",
            ToolName::Clang => "clang",
            ToolName::Csmith => "csmith",
            ToolName::Wasm => "wasm",
            ToolName::Emcc => "emcc.py",
            ToolName::Empp => "em++.py",
        }
    }

    /// Short role key used in dependency bundles
    pub fn role(self) -> &'static str {
        match self {
            ToolName::MsBuild => "msbuild",
            ToolName::CMake => "cmake",
            ToolName::M4 => "m4",
            ToolName::Make => "make",
            ToolName::Python => "python",
            ToolName::Clang => "clang",
            ToolName::Csmith => "csmith",
            ToolName::Wasm => "wasm",
            ToolName::Emcc => "emcc",
            ToolName::Empp => "empp",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolName::MsBuild => "MsBuild",
            ToolName::CMake => "CMake",
            ToolName::M4 => "m4",
            ToolName::Make => "make",
            ToolName::Python => "Python 2",
            ToolName::Clang => "clang",
            ToolName::Csmith => "csmith",
            ToolName::Wasm => "wasm",
            ToolName::Emcc => "emcc",
            ToolName::Empp => "em++",
        };
        write!(f, "{name}")
    }
}
