//! Style diagnostics - automated checks for styling exercises
//!
//! This library renders an exercise document through an external render
//! bridge, runs an ordered registry of checks against the computed styles
//! and source artifacts, and prints a tiered report.

pub mod cli;
pub mod commands;
pub mod common;
pub mod diagnostics;
pub mod exercises;
pub mod render;
pub mod source;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use exercises::Exercise;
