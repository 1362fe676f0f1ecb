//! Dependency bundles
//!
//! Each downstream build step receives one typed bundle of resolved tools.
//! Optional tools are `Option`s: `None` means "not present" or "not
//! applicable on this platform", never a guessed path.

use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::config::defaults::HOME_OVERRIDE_VARS;
use crate::infra::process::{Invocation, ProcessHandle};

/// Everything that can be resolved by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BundleKind {
    Msbuild,
    Python,
    Emscripten,
    SpecInterpreter,
    Generate,
    Csmith,
    Llvm,
}

impl BundleKind {
    /// Every kind, in the order `doctor` reports them
    pub const ALL: [BundleKind; 7] = [
        BundleKind::Msbuild,
        BundleKind::Python,
        BundleKind::Emscripten,
        BundleKind::SpecInterpreter,
        BundleKind::Generate,
        BundleKind::Csmith,
        BundleKind::Llvm,
    ];

    /// Name used on the command line and in reports
    pub fn name(self) -> &'static str {
        match self {
            BundleKind::Msbuild => "msbuild",
            BundleKind::Python => "python",
            BundleKind::Emscripten => "emscripten",
            BundleKind::SpecInterpreter => "spec-interpreter",
            BundleKind::Generate => "generate",
            BundleKind::Csmith => "csmith",
            BundleKind::Llvm => "llvm",
        }
    }
}

impl std::fmt::Display for BundleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One named entry of a bundle, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Role key, e.g. `cmake`
    pub name: &'static str,
    /// Resolved value, `None` when absent
    pub value: Option<String>,
}

impl Role {
    pub(crate) fn path(name: &'static str, path: &Path) -> Self {
        Self {
            name,
            value: Some(path.display().to_string()),
        }
    }

    pub(crate) fn optional(name: &'static str, path: Option<&Path>) -> Self {
        Self {
            name,
            value: path.map(|p| p.display().to_string()),
        }
    }
}

/// A named collection of resolved tools handed to one build step
pub trait DependencyBundle {
    /// Name of the consuming build step
    fn name(&self) -> &'static str;

    /// Every role in declaration order
    fn roles(&self) -> Vec<Role>;
}

/// Tools needed to build csmith
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsmithDependencies {
    /// `None` off Windows
    pub msbuild: Option<PathBuf>,
    pub cmake: PathBuf,
    pub m4: PathBuf,
}

impl DependencyBundle for CsmithDependencies {
    fn name(&self) -> &'static str {
        "csmith"
    }

    fn roles(&self) -> Vec<Role> {
        vec![
            Role::optional("msbuild", self.msbuild.as_deref()),
            Role::path("cmake", &self.cmake),
            Role::path("m4", &self.m4),
        ]
    }
}

/// Tools needed to build LLVM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlvmDependencies {
    pub cmake: PathBuf,
    /// `None` off Windows
    pub msbuild: Option<PathBuf>,
    /// `None` on Windows
    pub make: Option<PathBuf>,
}

impl DependencyBundle for LlvmDependencies {
    fn name(&self) -> &'static str {
        "llvm"
    }

    fn roles(&self) -> Vec<Role> {
        vec![
            Role::path("cmake", &self.cmake),
            Role::optional("msbuild", self.msbuild.as_deref()),
            Role::optional("make", self.make.as_deref()),
        ]
    }
}

/// Emscripten entry points and the interpreter that runs them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmscriptenDependencies {
    pub python: PathBuf,
    pub emcc: PathBuf,
    pub empp: PathBuf,
    /// Directory that stands in for the user's home during runs, so
    /// Emscripten reads the build's `.emscripten` file
    pub home: PathBuf,
}

impl EmscriptenDependencies {
    /// Invocation of `emcc` with `args`
    pub fn emcc_invocation<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.entry_invocation(&self.emcc, args)
    }

    /// Invocation of `em++` with `args`
    pub fn empp_invocation<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.entry_invocation(&self.empp, args)
    }

    /// Start `emcc` with inherited stdio
    pub fn run_emcc<I, S>(&self, args: I) -> ProcessHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.emcc_invocation(args).spawn()
    }

    /// Start `em++` with inherited stdio
    pub fn run_empp<I, S>(&self, args: I) -> ProcessHandle
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.empp_invocation(args).spawn()
    }

    fn entry_invocation<I, S>(&self, entry: &Path, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        HOME_OVERRIDE_VARS.iter().fold(
            Invocation::new(&self.python).arg(entry).args(args),
            |invocation, var| invocation.env(var, &self.home),
        )
    }
}

impl DependencyBundle for EmscriptenDependencies {
    fn name(&self) -> &'static str {
        "emscripten"
    }

    fn roles(&self) -> Vec<Role> {
        vec![
            Role::path("python", &self.python),
            Role::path("emcc", &self.emcc),
            Role::path("empp", &self.empp),
        ]
    }
}

/// How the spec interpreter build is driven
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SpecInterpreterDependencies {
    /// Windows: a batch script run through the command shell
    Cmd { cmd: String },
    /// Elsewhere: a makefile
    Make { make: PathBuf },
}

impl DependencyBundle for SpecInterpreterDependencies {
    fn name(&self) -> &'static str {
        "spec-interpreter"
    }

    fn roles(&self) -> Vec<Role> {
        match self {
            SpecInterpreterDependencies::Cmd { cmd } => vec![Role {
                name: "cmd",
                value: Some(cmd.clone()),
            }],
            SpecInterpreterDependencies::Make { make } => vec![Role::path("make", make)],
        }
    }
}

/// Tools needed to generate and compile test cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateDependencies {
    pub wasm: Option<PathBuf>,
    pub csmith: Option<PathBuf>,
    pub clang: Option<PathBuf>,
    #[serde(flatten)]
    pub emscripten: EmscriptenDependencies,
}

impl DependencyBundle for GenerateDependencies {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn roles(&self) -> Vec<Role> {
        let mut roles = vec![
            Role::optional("wasm", self.wasm.as_deref()),
            Role::optional("csmith", self.csmith.as_deref()),
            Role::optional("clang", self.clang.as_deref()),
        ];
        roles.extend(self.emscripten.roles());
        roles
    }
}
