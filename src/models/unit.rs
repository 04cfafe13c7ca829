//! Compilation-unit data structures
//!
//! A `Unit` is one loaded compilation unit reported by a
//! [`UnitLoader`](crate::core::loader::UnitLoader). Which fields a loader
//! fills in depends on the requested [`LoadMode`](crate::core::loader::LoadMode).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One loaded compilation unit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unit {
    /// Unit identity (import path), unique within one load
    pub unit_path: String,

    /// Declared unit name
    pub name: String,

    /// Source files belonging to the unit
    pub files: Vec<PathBuf>,

    /// Import paths of directly imported units
    pub imports: Vec<String>,

    /// Embedded files resolved for the unit
    pub embeds: Vec<PathBuf>,

    /// Errors encountered while loading this unit. A non-empty list does
    /// not make the containing load fail unless the walk is configured with
    /// `fail_on_unit_errors`.
    pub errors: Vec<UnitError>,
}

impl Unit {
    /// Create a unit with the given identity and no metadata
    pub fn new(unit_path: impl Into<String>) -> Self {
        Self {
            unit_path: unit_path.into(),
            ..Default::default()
        }
    }
}

/// An error attached to a single loaded unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitError {
    /// Source position in `file:line:col` form, empty when unknown
    pub pos: String,

    /// Human-readable description
    pub message: String,
}

impl UnitError {
    pub fn new(pos: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pos.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.pos, self.message)
        }
    }
}

impl std::error::Error for UnitError {}
