//! Error context utilities
//!
//! Extension traits for attaching path context to filesystem errors in a
//! consistent way throughout the crate.

use std::io;
use std::path::Path;

use crate::error::{Result, WalkError};

/// Extension trait for `io::Result` to attach path context
pub trait IoResultExt<T> {
    /// Wrap a stat failure with the path that was statted
    fn stat_context<P: AsRef<Path>>(self, path: P) -> Result<T>;

    /// Wrap a directory-listing failure with the directory path
    fn read_dir_context<P: AsRef<Path>>(self, path: P) -> Result<T>;

    /// Wrap a file-read failure with the file path
    fn read_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn stat_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|source| WalkError::Stat {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    fn read_dir_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|source| WalkError::ReadDir {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    fn read_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|source| WalkError::ManifestRead {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}
