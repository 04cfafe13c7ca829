//! Error types and definitions for module-tree walking
//!
//! One error enum covers every fatal condition a walk can hit: filesystem
//! failures, manifest parse failures, unit-loader failures, aggregated
//! per-unit errors and callback errors, each carrying the offending path.

use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::unit::UnitError;

/// Boxed error type carried by callbacks and unit loaders
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for walk operations
#[derive(Debug, Error)]
pub enum WalkError {
    /// Manifest stat failure other than not-found
    #[error("error statting {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Directory listing failure
    #[error("error reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Manifest byte-read failure
    #[error("error reading {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Manifest syntax or directive failure. The message carries the
    /// offending line number when one is known, e.g. `line 4: unknown
    /// directive "foo"`.
    #[error("error parsing {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Unit-loader failure, distinct from per-unit errors
    #[error("error loading units in {path}: {source}")]
    UnitLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Per-unit errors aggregated at one module root
    #[error("{0}")]
    UnitErrors(UnitErrorSet),

    /// Callback failure, wrapped with the directory it was visiting
    #[error("in {path}: {source}")]
    Visit {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Settings file not found
    #[error("settings file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Settings file read failure
    #[error("error reading settings file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Settings file parse failure
    #[error("error parsing settings file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid exclude pattern
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl WalkError {
    /// Create a manifest parse error with file context
    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WalkError::ManifestParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a callback error with directory context
    pub fn visit(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        WalkError::Visit {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a unit-loader error with directory context
    pub fn unit_load(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        WalkError::UnitLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Walk down the source chain looking for a `WalkError`.
    ///
    /// Adapter failures (manifest parse, unit load, aggregated unit errors)
    /// surface wrapped in [`WalkError::Visit`] by the traversal layer; this
    /// recovers the inner error for inspection.
    pub fn root_walk_error(&self) -> &WalkError {
        if let WalkError::Visit { source, .. } = self {
            if let Some(inner) = source.downcast_ref::<WalkError>() {
                return inner.root_walk_error();
            }
        }
        self
    }
}

/// An error from a single unit, tagged with the unit's identity
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("loading {unit}: {source}")]
pub struct UnitLoadError {
    /// Identity of the originating unit
    pub unit: String,
    #[source]
    pub source: UnitError,
}

/// Every per-unit error collected at one module root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitErrorSet(pub Vec<UnitLoadError>);

impl UnitErrorSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnitLoadError> {
        self.0.iter()
    }
}

impl Deref for UnitErrorSet {
    type Target = [UnitLoadError];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for UnitErrorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// Result type alias for walk operations
pub type Result<T> = std::result::Result<T, WalkError>;
