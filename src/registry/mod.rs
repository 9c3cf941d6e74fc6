//! Perforce registry provider
//!
//! The host package manager talks to [`RegistryProvider`]. Lookups map p4
//! labels to versions; downloads sync a package subtree and copy it out.
//! Everything that touches P4CLIENT runs inside a workspace lease.

mod cache;
mod configure;
mod manifest;
mod package;
mod resolve;
mod sync;
mod tree;
mod version;

pub use cache::{CacheEntry, LookupCache};
pub use manifest::{PackageManifest, MANIFEST_FILE};
pub use package::{validate_version, PackageName};
pub use resolve::VersionResolver;
pub use sync::SyncCoordinator;
pub use version::{content_hash, is_stable, LookupResult, VersionEntry};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::ui::UiContext;
use crate::vcs::{CommandRunner, ProcessRunner, WorkspaceContext, P4};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Operations the host package manager invokes
#[async_trait]
pub trait RegistryProvider: Send + Sync {
    /// List the versions of a package and their content hashes
    async fn lookup(&self, package: &str) -> RegistryResult<LookupResult>;

    /// Materialize `version` of a package into `out_dir`
    ///
    /// On failure the contents of `out_dir` are undefined and must be
    /// discarded by the caller.
    async fn download(
        &self,
        package: &str,
        version: &str,
        hash: Option<&str>,
        meta: Option<&Value>,
        out_dir: &Path,
    ) -> RegistryResult<PackageManifest>;

    /// Read the manifest of `version` without copying the package out
    async fn get_package_config(
        &self,
        package: &str,
        version: &str,
        hash: Option<&str>,
        meta: Option<&Value>,
    ) -> RegistryResult<PackageManifest>;
}

/// Registry backed by a Perforce client workspace
pub struct P4Registry {
    config: RegistryConfig,
    root: PathBuf,
    cache: LookupCache,
    resolver: VersionResolver,
    sync: SyncCoordinator,
}

impl P4Registry {
    /// Create a registry that runs the real p4 executable
    pub fn new(config: RegistryConfig) -> RegistryResult<Self> {
        Self::with_runner(config, Arc::new(ProcessRunner::new()))
    }

    /// Create a registry with a custom command runner
    pub fn with_runner(
        config: RegistryConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> RegistryResult<Self> {
        config.validate()?;

        let root = std::path::absolute(&config.registry_path).map_err(|e| {
            RegistryError::io(
                format!("resolving registry path {}", config.registry_path.display()),
                e,
            )
        })?;

        let p4 = P4::new(runner, &config, root.clone());
        let workspace = WorkspaceContext::new(p4.clone());
        let cache = LookupCache::new(config.lookup_cache_dir());
        let resolver = VersionResolver::new(
            p4.clone(),
            workspace.clone(),
            cache.clone(),
            config.dev_tag.clone(),
        );
        let sync = SyncCoordinator::new(p4, workspace, config.dev_tag.clone());

        Ok(Self {
            config,
            root,
            cache,
            resolver,
            sync,
        })
    }

    /// Collect and validate registry settings interactively
    pub async fn configure(
        config: RegistryConfig,
        ctx: &UiContext,
    ) -> RegistryResult<RegistryConfig> {
        configure::configure(config, ctx).await
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Absolute registry root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lookup cache used by this registry
    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    fn resolve_package(&self, package: &str) -> RegistryResult<(PackageName, PathBuf)> {
        let name = PackageName::parse(package)?;
        let dir = name.local_path(&self.root)?;
        Ok((name, dir))
    }

    async fn prepare(&self, package: &str, version: &str) -> RegistryResult<PathBuf> {
        let (_, dir) = self.resolve_package(package)?;
        validate_version(version)?;
        self.sync.prepare(&dir, version).await?;
        Ok(dir)
    }
}

#[async_trait]
impl RegistryProvider for P4Registry {
    async fn lookup(&self, package: &str) -> RegistryResult<LookupResult> {
        let (name, dir) = self.resolve_package(package)?;
        self.resolver.lookup(&name, &dir).await
    }

    async fn download(
        &self,
        package: &str,
        version: &str,
        hash: Option<&str>,
        _meta: Option<&Value>,
        out_dir: &Path,
    ) -> RegistryResult<PackageManifest> {
        debug!(
            "Downloading {}@{} (hash {}) to {}",
            package,
            version,
            hash.unwrap_or("-"),
            out_dir.display()
        );

        let dir = self.prepare(package, version).await?;
        let copied = tree::copy_tree(&dir, out_dir).await?;
        tree::make_writable(out_dir).await?;
        info!(
            "Copied {} files of {}@{} to {}",
            copied,
            package,
            version,
            out_dir.display()
        );

        PackageManifest::read(&dir).await
    }

    async fn get_package_config(
        &self,
        package: &str,
        version: &str,
        _hash: Option<&str>,
        _meta: Option<&Value>,
    ) -> RegistryResult<PackageManifest> {
        let dir = self.prepare(package, version).await?;
        PackageManifest::read(&dir).await
    }
}
