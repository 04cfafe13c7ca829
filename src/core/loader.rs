//! Compilation-unit loading interface
//!
//! Loading is delegated to a caller-supplied [`UnitLoader`]. The walker only
//! owns the configuration handed to the loader and the defaulting rules for
//! it; what "loading" means is entirely the collaborator's business.

use bitflags::bitflags;
use std::path::Path;

use crate::error::BoxError;
use crate::models::unit::Unit;

bitflags! {
    /// Aspects of unit metadata a loader is asked to fill in.
    ///
    /// Loaders are free to compute more than requested; they should not
    /// compute less.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LoadMode: u32 {
        /// Unit identity and name resolution
        const NAME = 1 << 0;
        /// Source file lists
        const FILES = 1 << 1;
        /// Direct imports
        const IMPORTS = 1 << 2;
        /// Transitive dependency graph
        const DEPS = 1 << 3;
        /// Type information
        const TYPES = 1 << 4;
        /// Syntax trees
        const SYNTAX = 1 << 5;
        /// Identifier-to-type mapping
        const TYPES_INFO = 1 << 6;
        /// Type size and alignment info
        const TYPES_SIZES = 1 << 7;
        /// Owning-module metadata
        const MODULE = 1 << 8;
        /// Embedded-file lists
        const EMBED_FILES = 1 << 9;
        /// Embedded-file patterns
        const EMBED_PATTERNS = 1 << 10;

        /// The default mode: every aspect above.
        const DEFAULT = Self::NAME.bits()
            | Self::FILES.bits()
            | Self::IMPORTS.bits()
            | Self::DEPS.bits()
            | Self::TYPES.bits()
            | Self::SYNTAX.bits()
            | Self::TYPES_INFO.bits()
            | Self::TYPES_SIZES.bits()
            | Self::MODULE.bits()
            | Self::EMBED_FILES.bits()
            | Self::EMBED_PATTERNS.bits();
    }
}

/// Configuration handed to a [`UnitLoader`] for one module root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Requested metadata aspects. An empty mode on a walk's settings is
    /// resolved to [`LoadMode::DEFAULT`] before the loader sees it.
    pub mode: LoadMode,

    /// Whether test units are loaded alongside regular units
    pub include_tests: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            mode: LoadMode::DEFAULT,
            include_tests: false,
        }
    }
}

/// Loads the compilation units under one module root.
///
/// Implementations report two kinds of failure: returning `Err` is a
/// loader-level failure and aborts the walk; errors attached to individual
/// [`Unit`]s are collected per unit and only abort the walk when it is
/// configured with `fail_on_unit_errors`.
pub trait UnitLoader {
    fn load(
        &self,
        dir: &Path,
        config: &LoadConfig,
    ) -> std::result::Result<Vec<Unit>, BoxError>;
}

impl<F> UnitLoader for F
where
    F: Fn(&Path, &LoadConfig) -> std::result::Result<Vec<Unit>, BoxError>,
{
    fn load(&self, dir: &Path, config: &LoadConfig) -> std::result::Result<Vec<Unit>, BoxError> {
        self(dir, config)
    }
}
