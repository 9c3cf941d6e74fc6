//! Persistent lookup cache
//!
//! One JSON file per package. A missing or unreadable file is a cache
//! miss, never an error. Writes go to a temporary sibling first and are
//! renamed into place, so readers never see a partial body.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::package::PackageName;
use crate::registry::version::VersionEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Last successful lookup of a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Digest of the label listing the versions were computed from
    pub token: String,

    /// Label-derived versions (the development version is never cached)
    pub versions: BTreeMap<String, VersionEntry>,

    /// Highest stable version at the time of the lookup
    pub latest: Option<String>,

    /// When the entry was written
    pub fetched_at: DateTime<Utc>,
}

/// Lookup cache rooted at a directory
#[derive(Debug, Clone)]
pub struct LookupCache {
    dir: PathBuf,
}

impl LookupCache {
    /// Create a cache in `dir` (created lazily on first write)
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the cached entry for a package, if any
    pub async fn load(&self, package: &PackageName) -> Option<CacheEntry> {
        let path = self.cache_path(package);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entry) => {
                debug!("Loaded lookup cache for {}", package);
                Some(entry)
            }
            Err(e) => {
                warn!("Ignoring malformed cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Replace the cached entry for a package
    pub async fn store(&self, package: &PackageName, entry: &CacheEntry) -> RegistryResult<()> {
        let path = self.cache_path(package);
        let parent = path.parent().unwrap_or(&self.dir);
        fs::create_dir_all(parent)
            .await
            .map_err(|e| RegistryError::io(format!("creating cache dir {}", parent.display()), e))?;

        let content = serde_json::to_string_pretty(entry)?;
        let staging = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));

        fs::write(&staging, content)
            .await
            .map_err(|e| RegistryError::io(format!("writing cache file {}", staging.display()), e))?;

        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(RegistryError::io(
                format!("moving cache file into place at {}", path.display()),
                e,
            ));
        }

        debug!("Cached {} versions for {}", entry.versions.len(), package);
        Ok(())
    }

    /// Remove every cached entry and leftover staging file, returning how
    /// many entries were deleted
    pub async fn clear(&self) -> RegistryResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut pending = vec![self.dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| RegistryError::io(format!("reading cache dir {}", dir.display()), e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| RegistryError::io("reading cache entry", e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| RegistryError::io("reading cache entry type", e))?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }

                let is_entry = path.extension().is_some_and(|ext| ext == "json");
                // Staging files orphaned by an interrupted store
                let is_staging = path.extension().is_some_and(|ext| ext == "tmp");
                if is_entry || is_staging {
                    fs::remove_file(&path).await.map_err(|e| {
                        RegistryError::io(format!("removing cache file {}", path.display()), e)
                    })?;
                }
                if is_entry {
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }

    fn cache_path(&self, package: &PackageName) -> PathBuf {
        let mut path = self.dir.clone();
        for segment in package.segments() {
            path.push(segment);
        }
        let file = format!(
            "{}.json",
            path.file_name().map(|f| f.to_string_lossy()).unwrap_or_default()
        );
        path.set_file_name(file);
        path
    }
}
