//! Core resolution logic
//!
//! Search strategies, version rules and dependency bundles live here.
//! Filesystem lookups and child processes are reached only through the
//! seams in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`tool`] - Names of the tools the pipeline needs
//! - [`platform`] - Host platform and environment snapshot
//! - [`search`] - Ordered search strategies per tool
//! - [`python`] - Python 2 version validation
//! - [`bundle`] - Typed dependency bundles handed to build steps
//! - [`resolver`] - Cached toolchain registry
//! - [`doctor`] - Report over every bundle

pub mod bundle;
pub mod doctor;
pub mod platform;
pub mod python;
pub mod resolver;
pub mod search;
pub mod tool;
