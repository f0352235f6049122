//! Cache directory inventory.

use std::path::{Path, PathBuf};

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::size::{DirectorySizer, ZERO_SIZE};
use crate::config::{HarnessConfig, PIP_CACHE};
use crate::shell::is_writable;

/// Snapshot of one cache directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheDirectoryInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub size: String,
    /// Whether the parent directory is writable by this process.
    pub writable: bool,
}

impl CacheDirectoryInfo {
    /// Inspect `path` now.
    pub fn inspect(path: &Path, sizer: &DirectorySizer) -> Self {
        let exists = path.exists();
        let size = if exists {
            sizer.size_of(path)
        } else {
            ZERO_SIZE.to_string()
        };
        let writable = path.parent().is_some_and(is_writable);
        Self {
            path: path.to_path_buf(),
            exists,
            size,
            writable,
        }
    }
}

/// Every configured cache directory, in declaration order.
///
/// Serializes as a map from directory name to [`CacheDirectoryInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheInventory {
    entries: Vec<(String, CacheDirectoryInfo)>,
}

impl CacheInventory {
    /// Inspect every directory the configuration knows about.
    pub fn collect(config: &HarnessConfig, sizer: &DirectorySizer) -> Self {
        let entries = config
            .cache_dirs()
            .iter()
            .map(|dir| {
                let info = CacheDirectoryInfo::inspect(&dir.path, sizer);
                tracing::debug!("{} -> {} ({})", dir.name, dir.path.display(), info.size);
                (dir.name.clone(), info)
            })
            .collect();
        Self { entries }
    }

    /// Look up a directory by name.
    pub fn get(&self, name: &str) -> Option<&CacheDirectoryInfo> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, info)| info)
    }

    /// Size of the pip cache, measuring it directly when not inventoried.
    pub fn pip_cache_size(&self, config: &HarnessConfig, sizer: &DirectorySizer) -> String {
        match self.get(PIP_CACHE) {
            Some(info) => info.size.clone(),
            None => sizer.size_of(&config.pip_cache()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CacheDirectoryInfo)> {
        self.entries.iter().map(|(n, info)| (n.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CacheInventory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, info) in &self.entries {
            map.serialize_entry(name, info)?;
        }
        map.end()
    }
}
