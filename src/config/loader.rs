//! Override file discovery and loading.

use crate::config::schema::ConfigFile;
use crate::error::{CacheProbeError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the override file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".cacheprobe.yml";

/// Find the override file in the project root, if present.
pub fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load and parse a single override file.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Err(CacheProbeError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content).map_err(|e| CacheProbeError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load overrides for a project.
///
/// An explicit path must exist. Without one, the project's
/// `.cacheprobe.yml` is used when present, otherwise defaults apply.
pub fn load_overrides(project_root: &Path, explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(path)
        }
        None => match find_config_file(project_root) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                load_config_file(&path)
            }
            None => Ok(ConfigFile::default()),
        },
    }
}
