//! Single-flight synchronization of package trees
//!
//! Syncing a package wipes its local tree and force-syncs it from the
//! server. Concurrent callers for the same tree share one operation and
//! its outcome. Handles are kept for the life of the coordinator, so a
//! tree is synced at most once per registry instance unless a sync of an
//! overlapping tree (an ancestor or descendant directory) rewrites it.

use crate::error::{RegistryError, RegistryResult};
use crate::registry::tree::remove_tree;
use crate::vcs::{WorkspaceContext, P4};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

type SyncHandle = Shared<BoxFuture<'static, Result<(), Arc<RegistryError>>>>;

struct InFlight {
    version: String,
    handle: SyncHandle,
}

/// Deduplicates destructive syncs per package directory
#[derive(Clone)]
pub struct SyncCoordinator {
    p4: P4,
    workspace: WorkspaceContext,
    dev_tag: String,
    inflight: Arc<Mutex<HashMap<PathBuf, InFlight>>>,
}

impl SyncCoordinator {
    /// Create a coordinator
    pub fn new(p4: P4, workspace: WorkspaceContext, dev_tag: String) -> Self {
        Self {
            p4,
            workspace,
            dev_tag,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Make `dir` hold `version`, sharing any sync already started for it
    pub async fn prepare(&self, dir: &Path, version: &str) -> RegistryResult<()> {
        let handle = {
            let mut inflight = self
                .inflight
                .lock()
                .map_err(|_| RegistryError::Internal("sync table poisoned".to_string()))?;

            match inflight.get(dir) {
                Some(existing) => {
                    if existing.version != version {
                        warn!(
                            "{} was already synced to {}; reusing it for {}",
                            dir.display(),
                            existing.version,
                            version
                        );
                    }
                    existing.handle.clone()
                }
                None => {
                    // Overlapping trees get rewritten by this sync: forget
                    // them and let their own syncs finish first.
                    let overlapping: Vec<PathBuf> = inflight
                        .keys()
                        .filter(|path| path.starts_with(dir) || dir.starts_with(path))
                        .cloned()
                        .collect();
                    let mut before = Vec::with_capacity(overlapping.len());
                    for path in overlapping {
                        if let Some(stale) = inflight.remove(&path) {
                            debug!("Sync of {} invalidates {}", dir.display(), path.display());
                            before.push(stale.handle);
                        }
                    }

                    let handle = self.start(dir.to_path_buf(), version.to_string(), before);
                    inflight.insert(
                        dir.to_path_buf(),
                        InFlight {
                            version: version.to_string(),
                            handle: handle.clone(),
                        },
                    );
                    handle
                }
            }
        };

        handle.await.map_err(|source| RegistryError::Sync {
            path: dir.to_path_buf(),
            source,
        })
    }

    /// Spawn the sync so it completes even if every caller stops waiting
    fn start(&self, dir: PathBuf, version: String, before: Vec<SyncHandle>) -> SyncHandle {
        let p4 = self.p4.clone();
        let workspace = self.workspace.clone();
        let revision = (version != self.dev_tag).then_some(version);

        let task = tokio::spawn(async move {
            // Their outcome belongs to their own callers
            for handle in before {
                let _ = handle.await;
            }

            remove_tree(&dir).await?;
            info!(
                "Syncing {}{}",
                dir.display(),
                revision.as_deref().map(|r| format!("@{}", r)).unwrap_or_default()
            );
            workspace
                .scoped(|| p4.sync_force(&dir, revision.as_deref()))
                .await
        });

        async move {
            match task.await {
                Ok(result) => result.map_err(Arc::new),
                Err(e) => Err(Arc::new(RegistryError::Internal(format!(
                    "sync task failed: {}",
                    e
                )))),
            }
        }
        .boxed()
        .shared()
    }
}
