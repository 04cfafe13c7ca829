//! Error handling for module-tree walking
//!
//! This module provides the error types for walk operations, a result alias,
//! and context utilities for wrapping filesystem errors with the offending
//! path.

pub mod context;
pub mod types;

pub use context::IoResultExt;
pub use types::{BoxError, Result, UnitErrorSet, UnitLoadError, WalkError};
