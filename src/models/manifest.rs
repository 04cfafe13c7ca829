//! Manifest data structures
//!
//! A structured representation of one module manifest (`go.mod`): the
//! module's declared identity plus its require, exclude, replace and retract
//! directives.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name identifying a module root
pub const MANIFEST_FILE: &str = "go.mod";

/// Parsed module manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Path of the manifest file this value was parsed from
    pub path: PathBuf,

    /// Declared module path, if the `module` directive is present
    pub module: Option<String>,

    /// Declared language version (`go` directive)
    pub go_version: Option<String>,

    /// Declared toolchain name (`toolchain` directive)
    pub toolchain: Option<String>,

    /// `require` directives in declaration order
    pub requires: Vec<Require>,

    /// `exclude` directives in declaration order
    pub excludes: Vec<ModuleVersion>,

    /// `replace` directives in declaration order
    pub replaces: Vec<Replace>,

    /// `retract` directives in declaration order
    pub retracts: Vec<Retract>,
}

impl Manifest {
    /// Look up the required version of a module, if any
    pub fn required_version(&self, module_path: &str) -> Option<&str> {
        self.requires
            .iter()
            .find(|r| r.module.path == module_path)
            .map(|r| r.module.version.as_str())
    }
}

/// A module path paired with a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVersion {
    pub path: String,
    pub version: String,
}

/// One `require` directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Require {
    pub module: ModuleVersion,

    /// Whether the requirement carried an `// indirect` marker
    pub indirect: bool,
}

/// One `replace` directive
///
/// The replacement target is either another module (with a version) or a
/// filesystem path (without one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replace {
    pub old_path: String,
    pub old_version: Option<String>,
    pub new_path: String,
    pub new_version: Option<String>,
}

/// One `retract` directive, a single version or a closed range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retract {
    pub low: String,
    pub high: String,
}

impl Retract {
    /// Retraction of a single version
    pub fn single(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            low: version.clone(),
            high: version,
        }
    }
}
