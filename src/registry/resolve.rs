//! Version resolution from p4 labels
//!
//! Labels under a package's subtree become versions. Each version's hash
//! is derived from the newest change at that label, and a synthetic
//! development version tracks the newest change overall.

use crate::error::RegistryResult;
use crate::registry::cache::{CacheEntry, LookupCache};
use crate::registry::package::PackageName;
use crate::registry::version::{latest_stable, LookupResult, VersionEntry};
use crate::vcs::records::parse_label_line;
use crate::vcs::{WorkspaceContext, P4};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Output of the p4 queries made inside one workspace lease
struct Resolved {
    token: String,
    labels: BTreeMap<String, VersionEntry>,
    dev: VersionEntry,
}

/// Resolves the version map of a package
#[derive(Debug, Clone)]
pub struct VersionResolver {
    p4: P4,
    workspace: WorkspaceContext,
    cache: LookupCache,
    dev_tag: String,
}

impl VersionResolver {
    /// Create a resolver
    pub fn new(p4: P4, workspace: WorkspaceContext, cache: LookupCache, dev_tag: String) -> Self {
        Self {
            p4,
            workspace,
            cache,
            dev_tag,
        }
    }

    /// Look up every version of `package`, whose files live in `dir`
    pub async fn lookup(&self, package: &PackageName, dir: &Path) -> RegistryResult<LookupResult> {
        let cached = self.cache.load(package).await;

        let resolved = self
            .workspace
            .scoped(|| self.query(package, dir, cached.as_ref()))
            .await?;

        let entry = CacheEntry {
            token: resolved.token,
            latest: latest_stable(&resolved.labels),
            versions: resolved.labels.clone(),
            fetched_at: Utc::now(),
        };
        if let Err(e) = self.cache.store(package, &entry).await {
            warn!("Failed to update lookup cache for {}: {}", package, e);
        }

        let mut versions = resolved.labels;
        if versions.insert(self.dev_tag.clone(), resolved.dev).is_some() {
            warn!(
                "Label {} of {} is shadowed by the development tag",
                self.dev_tag, package
            );
        }

        info!("Resolved {} versions of {}", versions.len(), package);
        Ok(LookupResult { versions })
    }

    async fn query(
        &self,
        package: &PackageName,
        dir: &Path,
        cached: Option<&CacheEntry>,
    ) -> RegistryResult<Resolved> {
        let listing = self.p4.labels(dir).await?;
        let token = listing_token(&listing);

        let labels = match cached {
            Some(entry) if entry.token == token => {
                debug!("Labels of {} unchanged, reusing cached versions", package);
                entry.versions.clone()
            }
            _ => self.resolve_labels(package, dir, &listing).await?,
        };

        // Always revalidated: there is no freshness token for the tip.
        let dev = match self.p4.latest_change(dir, None).await? {
            Some(change) => VersionEntry::development(package, &change.line),
            None => {
                debug!("No changes under {}", package);
                VersionEntry::development(package, "")
            }
        };

        Ok(Resolved { token, labels, dev })
    }

    async fn resolve_labels(
        &self,
        package: &PackageName,
        dir: &Path,
        listing: &str,
    ) -> RegistryResult<BTreeMap<String, VersionEntry>> {
        let mut versions = BTreeMap::new();

        for line in listing.lines().filter(|l| !l.trim().is_empty()) {
            let Some(label) = parse_label_line(line) else {
                warn!("Unable to get label from: {:?}", line);
                continue;
            };

            match self.p4.latest_change(dir, Some(label)).await? {
                Some(change) => {
                    versions.insert(
                        label.to_string(),
                        VersionEntry::for_label(package, label, &change.line),
                    );
                }
                None => warn!("Label {} has no changes under {}, skipping", label, package),
            }
        }

        Ok(versions)
    }
}

fn listing_token(listing: &str) -> String {
    hex::encode(Sha256::digest(listing.as_bytes()))
}
