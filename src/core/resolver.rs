//! Toolchain registry
//!
//! [`ToolchainRegistry`] resolves tools and dependency bundles and memoizes
//! successful results for its own lifetime. Create one per process run and
//! share it; there is no global state.
//!
//! Caches are `tokio::sync::OnceCell`s: concurrent requests for the same
//! tool share a single in-flight resolution, and a failed resolution leaves
//! the cell empty so the next request probes again.
//!
//! Composite bundles resolve their members sequentially in declaration
//! order and stop at the first failure.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::defaults::WINDOWS_COMMAND_SHELL;
use crate::config::settings::ToolchainConfig;
use crate::core::bundle::{
    BundleKind, CsmithDependencies, DependencyBundle, EmscriptenDependencies,
    GenerateDependencies, LlvmDependencies, Role, SpecInterpreterDependencies,
};
use crate::core::platform::HostEnv;
use crate::core::python::{is_supported_python, parse_python_version};
use crate::core::search::{SearchStrategy, ToolSearchSpec};
use crate::core::tool::ToolName;
use crate::error::ResolveError;
use crate::infra::lookup::{ExecutableLookup, LookupOutcome, WhichLookup};
use crate::infra::probe::{CommandVersionProbe, VersionProbe};

/// Process-lifetime toolchain resolver with per-tool caches
#[derive(Debug)]
pub struct ToolchainRegistry {
    env: HostEnv,
    config: ToolchainConfig,
    output_dir: PathBuf,
    lookup: Arc<dyn ExecutableLookup>,
    version_probe: Arc<dyn VersionProbe>,
    msbuild: OnceCell<PathBuf>,
    python: OnceCell<PathBuf>,
    emscripten: OnceCell<EmscriptenDependencies>,
    spec_interpreter: OnceCell<SpecInterpreterDependencies>,
    generate: OnceCell<GenerateDependencies>,
}

impl ToolchainRegistry {
    /// Create a registry using `which` lookups and real version queries
    ///
    /// `output_dir` becomes the home directory of Emscripten runs.
    pub fn new(env: HostEnv, config: ToolchainConfig, output_dir: PathBuf) -> Self {
        Self {
            env,
            config,
            output_dir,
            lookup: Arc::new(WhichLookup),
            version_probe: Arc::new(CommandVersionProbe::default()),
            msbuild: OnceCell::new(),
            python: OnceCell::new(),
            emscripten: OnceCell::new(),
            spec_interpreter: OnceCell::new(),
            generate: OnceCell::new(),
        }
    }

    /// Replace the executable lookup primitive
    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn ExecutableLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    /// Replace the interpreter version probe
    #[must_use]
    pub fn with_version_probe(mut self, probe: Arc<dyn VersionProbe>) -> Self {
        self.version_probe = probe;
        self
    }

    /// Environment this registry resolves against
    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    /// Configuration this registry resolves against
    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// PATH-style lookup for a tool's executable
    ///
    /// With `search_path` set, that path list is searched instead of the
    /// live `PATH`. A miss is `Ok(None)`; only unexpected lookup failures
    /// are errors.
    pub fn resolve_bare(
        &self,
        tool: ToolName,
        search_path: Option<&OsStr>,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let strategy = match search_path {
            Some(path) => SearchStrategy::bare_in(tool, path),
            None => SearchStrategy::bare(tool),
        };
        self.probe(tool, &strategy)
    }

    /// Walk a search spec in order and return the first hit
    pub fn search(&self, spec: &ToolSearchSpec) -> Result<Option<PathBuf>, ResolveError> {
        for strategy in &spec.strategies {
            if let Some(path) = self.probe(spec.tool, strategy)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    /// Like [`search`](Self::search), but a miss is fatal
    pub fn require(&self, spec: &ToolSearchSpec) -> Result<PathBuf, ResolveError> {
        self.search(spec)?
            .ok_or(ResolveError::MandatoryToolMissing { tool: spec.tool })
    }

    /// Locate `msbuild.exe`
    ///
    /// Off Windows this is `Ok(None)` without touching the filesystem. On
    /// Windows the tool is mandatory.
    pub async fn resolve_msbuild(&self) -> Result<Option<PathBuf>, ResolveError> {
        if !self.env.platform.is_windows() {
            return Ok(None);
        }
        let path = self.msbuild.get_or_try_init(|| self.find_msbuild()).await?;
        Ok(Some(path.clone()))
    }

    async fn find_msbuild(&self) -> Result<PathBuf, ResolveError> {
        let path = self.require(&ToolSearchSpec::msbuild())?;
        tracing::info!("MsBuild path: {}", path.display());
        Ok(path)
    }

    /// Locate a Python 2.7 interpreter
    ///
    /// Candidates that are found but fail the version check are skipped.
    pub async fn resolve_python(&self) -> Result<PathBuf, ResolveError> {
        let path = self.python.get_or_try_init(|| self.find_python()).await?;
        Ok(path.clone())
    }

    async fn find_python(&self) -> Result<PathBuf, ResolveError> {
        let spec = ToolSearchSpec::python(&self.env);
        for strategy in &spec.strategies {
            let Some(candidate) = self.probe(spec.tool, strategy)? else {
                continue;
            };
            if self.validate_python(&candidate).await {
                tracing::info!("Python path: {}", candidate.display());
                return Ok(candidate);
            }
        }
        Err(ResolveError::MandatoryToolMissing {
            tool: ToolName::Python,
        })
    }

    /// Resolve the Emscripten entry points and their interpreter
    pub async fn resolve_emscripten(&self) -> Result<EmscriptenDependencies, ResolveError> {
        let deps = self
            .emscripten
            .get_or_try_init(|| self.find_emscripten())
            .await?;
        Ok(deps.clone())
    }

    async fn find_emscripten(&self) -> Result<EmscriptenDependencies, ResolveError> {
        let python = self.resolve_python().await?;
        let root = self.config.third_party.emscripten.as_deref();
        Ok(EmscriptenDependencies {
            python,
            emcc: self.vendored_file(root, ToolName::Emcc)?,
            empp: self.vendored_file(root, ToolName::Empp)?,
            home: self.output_dir.clone(),
        })
    }

    /// Resolve what drives the spec interpreter build
    pub async fn resolve_spec_interpreter(
        &self,
    ) -> Result<SpecInterpreterDependencies, ResolveError> {
        let deps = self
            .spec_interpreter
            .get_or_try_init(|| async {
                // TODO: the interpreter also needs ocaml, which is not checked yet
                if self.env.platform.is_windows() {
                    return Ok(SpecInterpreterDependencies::Cmd {
                        cmd: WINDOWS_COMMAND_SHELL.to_string(),
                    });
                }
                self.require(&ToolSearchSpec::bare(ToolName::Make))
                    .map(|make| SpecInterpreterDependencies::Make { make })
            })
            .await?;
        Ok(deps.clone())
    }

    /// Resolve the test-case generation toolchain
    ///
    /// `wasm`, `csmith` and `clang` are optional: each is looked up on
    /// `PATH`, then in its vendored build directory, and may be absent.
    pub async fn resolve_generate_toolchain(&self) -> Result<GenerateDependencies, ResolveError> {
        let deps = self.generate.get_or_try_init(|| self.find_generate()).await?;
        Ok(deps.clone())
    }

    async fn find_generate(&self) -> Result<GenerateDependencies, ResolveError> {
        let bin_dirs = &self.config.bin_dirs;
        let wasm = self.search(&ToolSearchSpec::with_fallback(
            ToolName::Wasm,
            bin_dirs.spec.as_deref(),
        ))?;
        let csmith = self.search(&ToolSearchSpec::with_fallback(
            ToolName::Csmith,
            bin_dirs.csmith.as_deref(),
        ))?;
        let clang = self.search(&ToolSearchSpec::with_fallback(
            ToolName::Clang,
            bin_dirs.llvm.as_deref(),
        ))?;
        Ok(GenerateDependencies {
            wasm,
            csmith,
            clang,
            emscripten: self.resolve_emscripten().await?,
        })
    }

    /// Resolve the csmith build toolchain: msbuild, cmake, then m4
    pub async fn resolve_csmith_toolchain(&self) -> Result<CsmithDependencies, ResolveError> {
        let msbuild = self.resolve_msbuild().await?;
        let cmake = self.require(&ToolSearchSpec::bare(ToolName::CMake))?;
        let m4 = self.require(&ToolSearchSpec::m4(
            &self.env,
            self.config.third_party.m4.as_deref(),
        ))?;
        Ok(CsmithDependencies { msbuild, cmake, m4 })
    }

    /// Resolve the LLVM build toolchain: cmake, msbuild, then make
    pub async fn resolve_llvm_toolchain(&self) -> Result<LlvmDependencies, ResolveError> {
        let cmake = self.require(&ToolSearchSpec::bare(ToolName::CMake))?;
        let msbuild = self.resolve_msbuild().await?;
        let make = if self.env.platform.is_windows() {
            None
        } else {
            Some(self.require(&ToolSearchSpec::bare(ToolName::Make))?)
        };
        Ok(LlvmDependencies {
            cmake,
            msbuild,
            make,
        })
    }

    /// Resolve one kind by name and flatten it into report roles
    pub async fn resolve_roles(&self, kind: BundleKind) -> Result<Vec<Role>, ResolveError> {
        let roles = match kind {
            BundleKind::Msbuild => {
                vec![Role::optional("msbuild", self.resolve_msbuild().await?.as_deref())]
            }
            BundleKind::Python => vec![Role::path("python", &self.resolve_python().await?)],
            BundleKind::Emscripten => bundle_roles(&self.resolve_emscripten().await?),
            BundleKind::SpecInterpreter => bundle_roles(&self.resolve_spec_interpreter().await?),
            BundleKind::Generate => bundle_roles(&self.resolve_generate_toolchain().await?),
            BundleKind::Csmith => bundle_roles(&self.resolve_csmith_toolchain().await?),
            BundleKind::Llvm => bundle_roles(&self.resolve_llvm_toolchain().await?),
        };
        Ok(roles)
    }

    fn probe(
        &self,
        tool: ToolName,
        strategy: &SearchStrategy,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let outcome = match strategy {
            SearchStrategy::Bare { executable } => match &self.env.path {
                Some(path) => self.lookup.lookup(executable, path, &self.env.cwd),
                None => LookupOutcome::NotFound,
            },
            SearchStrategy::BareIn {
                executable,
                search_path,
            } => self.lookup.lookup(executable, search_path, &self.env.cwd),
            SearchStrategy::Constructed { executable, dirs } => {
                let dirs = dirs(&self.env);
                match join_search_path(&dirs) {
                    Some(path) => self.lookup.lookup(executable, &path, &self.env.cwd),
                    None => LookupOutcome::NotFound,
                }
            }
            SearchStrategy::Literal(path) => self.lookup.check_file(path),
        };

        match outcome {
            LookupOutcome::Found(path) => Ok(Some(self.absolute(path))),
            LookupOutcome::NotFound => {
                tracing::debug!("{tool}: no match for {strategy:?}");
                Ok(None)
            }
            LookupOutcome::Error(reason) => Err(ResolveError::UnexpectedLookup { tool, reason }),
        }
    }

    async fn validate_python(&self, candidate: &Path) -> bool {
        let output = match self.version_probe.version_output(candidate).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Failed to query {}: {}", candidate.display(), e);
                return false;
            }
        };
        match parse_python_version(&output) {
            Some(version) if is_supported_python(&version) => true,
            Some(version) => {
                tracing::debug!("Skipping {} (Python {version})", candidate.display());
                false
            }
            None => {
                tracing::debug!("Skipping {}: no version in output", candidate.display());
                false
            }
        }
    }

    fn vendored_file(&self, root: Option<&Path>, tool: ToolName) -> Result<PathBuf, ResolveError> {
        let missing = ResolveError::MandatoryToolMissing { tool };
        let root = root.ok_or_else(|| missing.clone())?;
        self.probe(tool, &SearchStrategy::Literal(root.join(tool.executable())))?
            .ok_or(missing)
    }

    fn absolute(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.env.cwd.join(path)
        }
    }
}

fn bundle_roles(bundle: &impl DependencyBundle) -> Vec<Role> {
    let roles = bundle.roles();
    tracing::debug!("Resolved {} dependencies ({} roles)", bundle.name(), roles.len());
    roles
}

/// Join directories into a platform path list, dropping any that cannot
/// be represented in one
fn join_search_path(dirs: &[PathBuf]) -> Option<std::ffi::OsString> {
    let usable = dirs
        .iter()
        .filter(|dir| std::env::join_paths(std::iter::once(dir)).is_ok());
    let joined = std::env::join_paths(usable).ok()?;
    (!joined.is_empty()).then_some(joined)
}
