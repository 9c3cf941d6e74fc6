//! Version map types returned by lookup

use crate::registry::package::PackageName;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Content identity of one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Hex SHA-256 of the package name and backing change record
    pub hash: String,

    /// False for non-semver labels and the development version
    #[serde(default = "stable_default", skip_serializing_if = "is_true")]
    pub stable: bool,
}

impl VersionEntry {
    /// Entry for a label, stable when the label is a semver literal
    pub fn for_label(package: &PackageName, label: &str, change_line: &str) -> Self {
        Self {
            hash: content_hash(package, change_line),
            stable: is_stable(label),
        }
    }

    /// Entry for the development tag, never stable
    pub fn development(package: &PackageName, change_line: &str) -> Self {
        Self {
            hash: content_hash(package, change_line),
            stable: false,
        }
    }
}

/// Result of looking up one package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    /// Version string to entry
    pub versions: BTreeMap<String, VersionEntry>,
}

impl LookupResult {
    /// Highest stable semver version, if any
    pub fn latest(&self) -> Option<String> {
        latest_stable(&self.versions)
    }
}

/// Deterministic digest of a package name and change record
pub fn content_hash(package: &PackageName, change_line: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(package.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(change_line.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether a label is a canonical semantic version literal
pub fn is_stable(label: &str) -> bool {
    semver::Version::parse(label).is_ok()
}

/// Highest stable version key in a version map
pub fn latest_stable(versions: &BTreeMap<String, VersionEntry>) -> Option<String> {
    versions
        .iter()
        .filter(|(_, entry)| entry.stable)
        .filter_map(|(key, _)| semver::Version::parse(key).ok().map(|v| (v, key)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, key)| key.clone())
}

fn stable_default() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}
