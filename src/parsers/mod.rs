//! Parsing functionality for module manifests
//!
//! This module provides the manifest parsing collaborator used by the
//! walker's manifest-enriched entry points.

pub mod modfile;

pub use modfile::ModfileParser;
