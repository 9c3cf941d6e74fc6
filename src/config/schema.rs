//! Configuration schema for p4reg
//!
//! Configuration is stored at `~/.config/p4reg/config.toml`

use crate::error::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Development tag used when none is configured
pub const DEFAULT_DEV_TAG: &str = "dev";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Registry adapter settings
    pub registry: RegistryConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Perforce registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Local root of the registry inside the client workspace
    pub registry_path: PathBuf,

    /// Client (P4CLIENT) whose view maps the registry
    pub workspace: String,

    /// Version name that always tracks the latest change
    pub dev_tag: String,

    /// Timeout for each p4 invocation, in seconds
    pub timeout_secs: u64,

    /// p4 executable; may be fully qualified
    pub p4_program: String,

    /// Lookup cache directory (defaults to the user cache dir)
    pub cache_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::new(),
            workspace: String::new(),
            dev_tag: DEFAULT_DEV_TAG.to_string(),
            timeout_secs: 120,
            p4_program: if cfg!(windows) { "p4.exe" } else { "p4" }.to_string(),
            cache_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Check that every required field is present
    pub fn validate(&self) -> RegistryResult<()> {
        if self.registry_path.as_os_str().is_empty() {
            return Err(RegistryError::ConfigMissing("registry.registry_path"));
        }
        if self.workspace.trim().is_empty() {
            return Err(RegistryError::ConfigMissing("registry.workspace"));
        }
        if self.dev_tag.trim().is_empty() {
            return Err(RegistryError::ConfigMissing("registry.dev_tag"));
        }
        if self.p4_program.trim().is_empty() {
            return Err(RegistryError::ConfigMissing("registry.p4_program"));
        }
        if self.timeout_secs == 0 {
            return Err(RegistryError::ConfigValue {
                key: "registry.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Per-invocation timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory holding one lookup cache file per package
    pub fn lookup_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("p4reg")
                .join("lookup")
        })
    }
}
