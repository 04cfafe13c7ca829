//! modwalk - module discovery over directory trees
//!
//! This library walks a directory tree locating module roots (directories
//! containing a `go.mod` manifest) and calls caller-supplied callbacks with
//! increasing levels of enrichment: the bare directory path, the parsed
//! manifest, loaded compilation-unit metadata, or manifest and units
//! together.
//!
//! Traversal is depth-first and pre-order. Callbacks steer it with
//! [`FlowControl`]: prune one subtree, stop the whole walk cleanly, or keep
//! going. Hidden directories and, by default, `vendor` and `testdata`
//! subtrees are never entered.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod parsers;

// Re-export commonly used types
pub use crate::core::loader::{LoadConfig, LoadMode, UnitLoader};
pub use crate::core::walker::{
    each, each_manifest, load_each, load_each_manifest, FlowControl, VisitResult, Walker,
};
pub use crate::error::{BoxError, Result, UnitErrorSet, UnitLoadError, WalkError};
pub use crate::models::{
    config::{PartialWalkSettings, VersionFixer, WalkSettings},
    manifest::{Manifest, ModuleVersion, Replace, Require, Retract, MANIFEST_FILE},
    unit::{Unit, UnitError},
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
