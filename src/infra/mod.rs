//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem lookups and external processes.
//! This module is the only place where side effects occur.

pub mod dirs;
pub mod lookup;
pub mod probe;
pub mod process;
