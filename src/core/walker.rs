//! Directory walking functionality
//!
//! This module provides the traversal primitive that discovers module roots
//! (directories containing a manifest file) and the layered entry points
//! that enrich each discovered root with a parsed manifest, loaded unit
//! metadata, or both.

use glob::Pattern;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::loader::{LoadConfig, LoadMode, UnitLoader};
use crate::error::{BoxError, IoResultExt, Result, UnitErrorSet, UnitLoadError, WalkError};
use crate::models::config::WalkSettings;
use crate::models::manifest::{Manifest, MANIFEST_FILE};
use crate::models::unit::Unit;
use crate::parsers::modfile::ModfileParser;

/// Control signal returned by a visit callback.
///
/// Signals are distinct from errors: pruning and early termination are
/// ordinary outcomes of a walk, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
    /// Keep walking
    Continue,
    /// Do not descend below the current directory; siblings elsewhere in
    /// the tree are still visited
    SkipSubtree,
    /// Abort the entire walk; the walk itself returns success
    StopAll,
}

/// Return type of visit callbacks
pub type VisitResult = std::result::Result<FlowControl, BoxError>;

/// Outcome of one branch of the recursion
enum Step {
    Continue,
    Stop,
}

/// Walker over a directory tree of modules.
///
/// The zero-configuration walker (`Walker::default()`) visits every module
/// root reachable from the walk root, skipping hidden directories and
/// `vendor`/`testdata` subtrees. Construction with [`Walker::new`] takes a
/// [`WalkSettings`] controlling pruning, manifest parsing and unit loading.
///
/// A walker holds no per-walk state: the same instance may run any number
/// of sequential walks.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    settings: WalkSettings,
}

impl Walker {
    /// Create a new walker with the given settings
    pub fn new(settings: WalkSettings) -> Self {
        Self { settings }
    }

    /// Get the current settings
    pub fn settings(&self) -> &WalkSettings {
        &self.settings
    }

    /// Call `visit` for each module root in `dir` and its subdirectories.
    ///
    /// A module root is identified by the presence of a manifest file
    /// (`go.mod`). The path passed to `visit` has `dir` as a prefix. A
    /// module root's own subtree is still descended, so nested modules are
    /// visited too.
    ///
    /// Subdirectories are visited in name order, depth-first. Directories
    /// whose name starts with `.` or `_` are never entered.
    pub fn each<P, F>(&self, dir: P, mut visit: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnMut(&Path) -> VisitResult,
    {
        let patterns = compile_patterns(&self.settings.exclude_patterns)?;
        self.walk(dir.as_ref(), &patterns, &mut visit).map(|_| ())
    }

    /// Call `visit` with each module root and its parsed manifest.
    ///
    /// The manifest is parsed strictly or leniently per the walker's
    /// `parse_lax` setting, applying the configured version fixer. A read
    /// or parse failure aborts the whole walk.
    pub fn each_manifest<P, F>(&self, dir: P, mut visit: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, Manifest) -> VisitResult,
    {
        self.each(dir, |subdir| {
            let manifest = self.parse_manifest_at(subdir)?;
            visit(subdir, manifest)
        })
    }

    /// Call `visit` with each module root and the units `loader` reports
    /// for it.
    ///
    /// The loader receives the walker's load configuration with unset
    /// pieces defaulted (see [`LoadConfig`]). A loader-level failure aborts
    /// the walk. When `fail_on_unit_errors` is set, any per-unit errors at
    /// a root are joined into one aggregated error and abort the walk
    /// without invoking `visit` for that root.
    pub fn load_each<P, L, F>(&self, dir: P, loader: &L, mut visit: F) -> Result<()>
    where
        P: AsRef<Path>,
        L: UnitLoader + ?Sized,
        F: FnMut(&Path, Vec<Unit>) -> VisitResult,
    {
        let config = self.resolved_load_config();
        self.each(dir, |subdir| {
            let units = loader
                .load(subdir, &config)
                .map_err(|source| WalkError::unit_load(subdir, source))?;

            if self.settings.fail_on_unit_errors {
                let aggregated = collect_unit_errors(&units);
                if !aggregated.is_empty() {
                    return Err(WalkError::UnitErrors(aggregated).into());
                }
            }

            visit(subdir, units)
        })
    }

    /// Call `visit` with each module root, its parsed manifest, and the
    /// units `loader` reports for it.
    ///
    /// Unit loading (with its error-aggregation policy) runs first, then
    /// manifest parsing; either failure aborts the walk.
    pub fn load_each_manifest<P, L, F>(&self, dir: P, loader: &L, mut visit: F) -> Result<()>
    where
        P: AsRef<Path>,
        L: UnitLoader + ?Sized,
        F: FnMut(&Path, Manifest, Vec<Unit>) -> VisitResult,
    {
        self.load_each(dir, loader, |subdir, units| {
            let manifest = self.parse_manifest_at(subdir)?;
            visit(subdir, manifest, units)
        })
    }

    /// The recursive traversal primitive behind the public entry points.
    fn walk<F>(&self, dir: &Path, patterns: &[Pattern], visit: &mut F) -> Result<Step>
    where
        F: FnMut(&Path) -> VisitResult,
    {
        if matches_any(dir, patterns) {
            debug!("pruning excluded directory {}", dir.display());
            return Ok(Step::Continue);
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        match fs::metadata(&manifest_path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                // no manifest, not a module root
            }
            Err(err) => return Err(WalkError::Stat { path: manifest_path, source: err }),
            Ok(_) => {
                trace!("visiting module root {}", dir.display());
                match visit(dir) {
                    Ok(FlowControl::Continue) => {}
                    Ok(FlowControl::SkipSubtree) => {
                        debug!("skipping subtree below {}", dir.display());
                        return Ok(Step::Continue);
                    }
                    Ok(FlowControl::StopAll) => return Ok(Step::Stop),
                    Err(source) => return Err(WalkError::visit(dir, source)),
                }
            }
        }

        for subdir in self.subdirectories(dir)? {
            if let Step::Stop = self.walk(&subdir, patterns, visit)? {
                return Ok(Step::Stop);
            }
        }

        Ok(Step::Continue)
    }

    /// List the subdirectories of `dir` eligible for descent, in name
    /// order.
    fn subdirectories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).read_dir_context(dir)?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.read_dir_context(dir)?;
            let file_type = entry.file_type().read_dir_context(dir)?;
            // symlinked directories are not followed
            if !file_type.is_dir() {
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') || name.starts_with('_') {
                continue;
            }
            if name == "vendor" && !self.settings.include_vendor {
                debug!("skipping vendor directory {}", entry.path().display());
                continue;
            }
            if name == "testdata" && !self.settings.include_testdata {
                debug!("skipping testdata directory {}", entry.path().display());
                continue;
            }

            subdirs.push(entry.path());
        }

        subdirs.sort();
        Ok(subdirs)
    }

    /// Read and parse the manifest at a discovered module root.
    fn parse_manifest_at(&self, dir: &Path) -> Result<Manifest> {
        let manifest_path = dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&manifest_path).read_context(&manifest_path)?;

        let fixer = self.settings.version_fixer.as_ref();
        if self.settings.parse_lax {
            ModfileParser::parse_lax(&manifest_path, &content, fixer)
        } else {
            ModfileParser::parse(&manifest_path, &content, fixer)
        }
    }

    /// The effective load configuration for this walk: an unset
    /// configuration means the full default, a set configuration with an
    /// empty mode gets the default mode.
    fn resolved_load_config(&self) -> LoadConfig {
        let mut config = self.settings.load_config.clone().unwrap_or_default();
        if config.mode.is_empty() {
            config.mode = LoadMode::DEFAULT;
        }
        config
    }
}

/// Call `visit` for each module root in `dir` and its subdirectories,
/// using a default walker. See [`Walker::each`].
pub fn each<P, F>(dir: P, visit: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> VisitResult,
{
    Walker::default().each(dir, visit)
}

/// Call `visit` with each module root and its parsed manifest, using a
/// default walker. See [`Walker::each_manifest`].
pub fn each_manifest<P, F>(dir: P, visit: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(&Path, Manifest) -> VisitResult,
{
    Walker::default().each_manifest(dir, visit)
}

/// Call `visit` with each module root and its loaded units, using a
/// default walker. See [`Walker::load_each`].
pub fn load_each<P, L, F>(dir: P, loader: &L, visit: F) -> Result<()>
where
    P: AsRef<Path>,
    L: UnitLoader + ?Sized,
    F: FnMut(&Path, Vec<Unit>) -> VisitResult,
{
    Walker::default().load_each(dir, loader, visit)
}

/// Call `visit` with each module root, its parsed manifest and its loaded
/// units, using a default walker. See [`Walker::load_each_manifest`].
pub fn load_each_manifest<P, L, F>(dir: P, loader: &L, visit: F) -> Result<()>
where
    P: AsRef<Path>,
    L: UnitLoader + ?Sized,
    F: FnMut(&Path, Manifest, Vec<Unit>) -> VisitResult,
{
    Walker::default().load_each_manifest(dir, loader, visit)
}

/// Compile exclude patterns into glob patterns
fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| WalkError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn matches_any(dir: &Path, patterns: &[Pattern]) -> bool {
    let dir_str = dir.to_string_lossy();
    patterns.iter().any(|pattern| pattern.matches(&dir_str))
}

/// Collect every per-unit error in a load, tagged with the originating
/// unit's identity.
fn collect_unit_errors(units: &[Unit]) -> UnitErrorSet {
    let mut errors = Vec::new();
    for unit in units {
        for err in &unit.errors {
            errors.push(UnitLoadError {
                unit: unit.unit_path.clone(),
                source: err.clone(),
            });
        }
    }
    UnitErrorSet(errors)
}
