//! Configuration management
//!
//! Walk settings are plain values; tools embedding the walker can also load
//! them from a settings file and merge several partial sources, later
//! sources winning.

pub mod file;

use crate::error::Result;
use crate::models::config::{PartialWalkSettings, WalkSettings};

pub use file::{find_default_settings_file, parse_settings_content, parse_settings_file};
pub use file::DEFAULT_SETTINGS_FILE;

/// Builder merging partial settings from multiple sources
pub struct SettingsBuilder {
    partial: PartialWalkSettings,
}

impl SettingsBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialWalkSettings::default(),
        }
    }

    /// Merge a partial configuration; its set fields take precedence
    pub fn merge(mut self, partial: PartialWalkSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge a settings file
    pub fn load_file(self, path: &std::path::Path) -> Result<Self> {
        let partial = parse_settings_file(path)?;
        Ok(self.merge(partial))
    }

    /// Build the final settings, defaulting unset fields
    pub fn build(self) -> WalkSettings {
        self.partial.to_settings()
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
