//! Package manifest (`package.json`) reading

use crate::error::{RegistryError, RegistryResult};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Manifest file name at the root of every package
pub const MANIFEST_FILE: &str = "package.json";

/// Parsed package manifest, handed back to the host untouched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PackageManifest(Value);

impl PackageManifest {
    /// Read and parse the manifest at the root of `package_dir`
    pub async fn read(package_dir: &Path) -> RegistryResult<Self> {
        let path = package_dir.join(MANIFEST_FILE);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| RegistryError::io(format!("reading manifest {}", path.display()), e))?;

        let value: Value =
            serde_json::from_str(&content).map_err(|e| RegistryError::ManifestInvalid {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if !value.is_object() {
            return Err(RegistryError::ManifestInvalid {
                path,
                reason: "top-level value is not an object".to_string(),
            });
        }

        Ok(Self(value))
    }

    /// `name` field, if present
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// `version` field, if present
    pub fn version(&self) -> Option<&str> {
        self.0.get("version").and_then(Value::as_str)
    }

    /// The raw JSON document
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_manifest_fields() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(MANIFEST_FILE),
            r#"{"name": "widget", "version": "1.1.0", "main": "index.js"}"#,
        )
        .unwrap();

        let manifest = PackageManifest::read(temp.path()).await.unwrap();
        assert_eq!(manifest.name(), Some("widget"));
        assert_eq!(manifest.version(), Some("1.1.0"));
        assert_eq!(manifest.as_value()["main"], "index.js");
    }

    #[tokio::test]
    async fn invalid_json_is_manifest_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "{ nope").unwrap();

        let err = PackageManifest::read(temp.path()).await.unwrap_err();
        assert!(matches!(err, RegistryError::ManifestInvalid { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn non_object_is_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(MANIFEST_FILE), "[1, 2]").unwrap();
        assert!(PackageManifest::read(temp.path()).await.is_err());
    }

    #[tokio::test]
    async fn missing_manifest_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = PackageManifest::read(temp.path()).await.unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
