//! Unified path management for DigiFarm files.
//!
//! Configuration lives under the platform config directory and staged previews
//! under the platform cache directory, both resolved by `dirs`, so Linux, macOS
//! and Windows behave the same way.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
    /// Cache directory could not be determined.
    CacheDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::CacheDirNotFound => write!(f, "Cannot find cache directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for DigiFarm.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/digifarm/          # Config directory
/// └── config.toml              # Application configuration
///
/// ~/.cache/digifarm/           # Cache directory (short-lived data)
/// └── previews/                # Staged image previews (FilePreviewStore)
/// ```
pub struct DigiFarmPaths;

impl DigiFarmPaths {
    const APP_DIR: &'static str = "digifarm";

    /// Returns the DigiFarm configuration directory (e.g. `~/.config/digifarm/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the DigiFarm cache directory (e.g. `~/.cache/digifarm/`).
    pub fn cache_dir() -> Result<PathBuf, PathError> {
        dirs::cache_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::CacheDirNotFound)
    }

    pub fn previews_dir() -> Result<PathBuf, PathError> {
        Ok(Self::cache_dir()?.join("previews"))
    }
}
