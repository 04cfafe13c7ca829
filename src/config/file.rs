//! Settings file handling

use std::path::{Path, PathBuf};

use crate::error::{Result, WalkError};
use crate::models::config::PartialWalkSettings;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = ".modwalk.toml";

/// Parse a settings file into partial settings
pub fn parse_settings_file(path: &Path) -> Result<PartialWalkSettings> {
    if !path.exists() {
        return Err(WalkError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| WalkError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_settings_content(&content, path)
}

/// Parse settings file content into partial settings
pub fn parse_settings_content(content: &str, path: &Path) -> Result<PartialWalkSettings> {
    toml::from_str(content).map_err(|source| WalkError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Look for the default settings file in a directory
pub fn find_default_settings_file(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(DEFAULT_SETTINGS_FILE);
    candidate.is_file().then_some(candidate)
}
