//! Default configuration values

use std::time::Duration;

/// Environment variable holding the executable search path
pub const ENV_PATH: &str = "PATH";

/// Environment variable naming the 64-bit "Program Files" root
pub const ENV_PROGRAM_FILES: &str = "ProgramFiles";

/// Environment variable naming the 32-bit "Program Files" root
pub const ENV_PROGRAM_FILES_X86: &str = "ProgramFiles(x86)";

/// Environment variable pointing at a Python install directory
pub const ENV_PYTHON: &str = "PYTHON";

/// Home directory variables redirected for Emscripten runs
pub const HOME_OVERRIDE_VARS: [&str; 2] = ["HOME", "USERPROFILE"];

/// Conventional Python 2 install directory on Windows
pub const WINDOWS_PYTHON_DIR: &str = "C:\\Python27";

/// Interpreter names tried at each Python location, in order
pub const PYTHON_EXECUTABLES: [&str; 2] = ["python", "python2"];

/// Argument that makes an interpreter print its version
pub const PYTHON_VERSION_ARG: &str = "--version";

/// Upper bound on a single interpreter version query
pub const PYTHON_VERSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Accepted Python interpreter versions
pub const PYTHON_VERSION_REQ: &str = ">=2.7.0, <3.0.0";

/// Visual Studio install folder under a "Program Files" root
pub const VISUAL_STUDIO_DIR: &str = "Microsoft Visual Studio";

/// Visual Studio editions, newest first
pub const VISUAL_STUDIO_EDITIONS: [&str; 2] = ["2017", "Preview"];

/// MsBuild version shipped inside Visual Studio editions
pub const MSBUILD_MODERN_VERSION: &str = "15.0";

/// Standalone MsBuild versions, newest first
pub const MSBUILD_LEGACY_VERSIONS: [&str; 3] = ["14.0", "12.0", "10.0"];

/// MsBuild folder name inside install roots
pub const MSBUILD_DIR: &str = "MSBuild";

/// Bin sub-folders that may hold `msbuild.exe`
pub const MSBUILD_BIN_FOLDERS: [&str; 3] = ["bin", "bin/x86", "bin/amd64"];

/// Command shell used to drive the spec interpreter build on Windows
pub const WINDOWS_COMMAND_SHELL: &str = "cmd";
