//! Toolprobe - toolchain discovery for the wasm test-case pipeline
//!
//! This library locates the external tools the pipeline drives (MSBuild,
//! CMake, m4, make, Python 2, Emscripten and friends), validates them,
//! groups them into per-step dependency bundles, and runs child processes
//! to completion with optional output capture.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Search strategies, bundles and the cached registry
//! - [`infra`] - Infrastructure layer (lookups, processes, directories)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
