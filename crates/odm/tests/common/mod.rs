//! Test infrastructure for the mapping compiler.
//!
//! Shared entity fixtures, a harness that owns everything a builder borrows, and
//! assertion helpers for mapping documents.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
