//! Traversal configuration data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::loader::LoadConfig;
use crate::error::BoxError;

/// Version-string normalization hook applied while parsing manifest
/// directives. Receives the module path and the raw version string and
/// returns the version to record.
pub type VersionFixer =
    Arc<dyn Fn(&str, &str) -> std::result::Result<String, BoxError> + Send + Sync>;

/// Settings controlling one traversal.
///
/// A `WalkSettings` value is read-only for the duration of a walk and may be
/// reused across any number of walks.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct WalkSettings {
    /// Whether to descend into `vendor` directories
    #[serde(default)]
    pub include_vendor: bool,

    /// Whether to descend into `testdata` directories
    #[serde(default)]
    pub include_testdata: bool,

    /// Glob patterns pruning whole subtrees, matched against the full
    /// directory path
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Whether to parse manifests leniently (unknown or malformed
    /// directives are skipped instead of failing the walk)
    #[serde(default)]
    pub parse_lax: bool,

    /// Version-string fixer applied while parsing manifests. `None` means
    /// versions are recorded as written.
    #[serde(skip)]
    pub version_fixer: Option<VersionFixer>,

    /// Configuration handed to the unit loader. `None` means the full
    /// default configuration; a set value with an empty mode gets the
    /// default mode.
    #[serde(skip)]
    pub load_config: Option<LoadConfig>,

    /// Whether per-unit load errors abort the walk as one aggregated error
    #[serde(default)]
    pub fail_on_unit_errors: bool,
}

impl fmt::Debug for WalkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkSettings")
            .field("include_vendor", &self.include_vendor)
            .field("include_testdata", &self.include_testdata)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("parse_lax", &self.parse_lax)
            .field("version_fixer", &self.version_fixer.as_ref().map(|_| "..."))
            .field("load_config", &self.load_config)
            .field("fail_on_unit_errors", &self.fail_on_unit_errors)
            .finish()
    }
}

/// Partial settings for configuration merging
///
/// Covers the fields expressible in a settings file. Function-valued and
/// loader-specific fields are configured programmatically on
/// [`WalkSettings`] directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialWalkSettings {
    pub include_vendor: Option<bool>,
    pub include_testdata: Option<bool>,
    pub exclude_patterns: Option<Vec<String>>,
    pub parse_lax: Option<bool>,
    pub fail_on_unit_errors: Option<bool>,
}

impl PartialWalkSettings {
    /// Merge another `PartialWalkSettings` into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialWalkSettings) {
        if other.include_vendor.is_some() {
            self.include_vendor = other.include_vendor;
        }
        if other.include_testdata.is_some() {
            self.include_testdata = other.include_testdata;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.parse_lax.is_some() {
            self.parse_lax = other.parse_lax;
        }
        if other.fail_on_unit_errors.is_some() {
            self.fail_on_unit_errors = other.fail_on_unit_errors;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> WalkSettings {
        let mut settings = WalkSettings::default();

        if let Some(include_vendor) = self.include_vendor {
            settings.include_vendor = include_vendor;
        }
        if let Some(include_testdata) = self.include_testdata {
            settings.include_testdata = include_testdata;
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(parse_lax) = self.parse_lax {
            settings.parse_lax = parse_lax;
        }
        if let Some(fail_on_unit_errors) = self.fail_on_unit_errors {
            settings.fail_on_unit_errors = fail_on_unit_errors;
        }

        settings
    }
}
