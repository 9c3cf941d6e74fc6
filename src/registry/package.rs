//! Package name validation
//!
//! Names are allow-listed rather than quoted: a name that passes
//! [`PackageName::parse`] can be joined under the registry root and handed
//! to p4 as an argument without any further escaping beyond `@`.

use crate::error::{RegistryError, RegistryResult};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A validated package name such as `widget`, `acme/widget` or `@acme/widget`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Validate a package name
    pub fn parse(name: &str) -> RegistryResult<Self> {
        if name.is_empty() {
            return Err(RegistryError::invalid_name(name, "name is empty"));
        }
        if name.contains("...") {
            return Err(RegistryError::invalid_name(
                name,
                "'...' is a Perforce wildcard",
            ));
        }

        for (i, segment) in name.split('/').enumerate() {
            let body = match segment.strip_prefix('@') {
                Some(scope) if i == 0 => scope,
                Some(_) => {
                    return Err(RegistryError::invalid_name(
                        name,
                        "'@' is only allowed at the start of the scope",
                    ))
                }
                None => segment,
            };
            check_segment(name, body)?;
        }

        Ok(Self(name.to_string()))
    }

    /// The name as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments of the name
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolve the package directory under `root`
    pub fn local_path(&self, root: &Path) -> RegistryResult<PathBuf> {
        let mut path = root.to_path_buf();
        for segment in self.segments() {
            path.push(segment);
        }

        let escapes = !path.starts_with(root)
            || path
                .strip_prefix(root)
                .map(|rel| rel.components().any(|c| !matches!(c, Component::Normal(_))))
                .unwrap_or(true);
        if escapes {
            return Err(RegistryError::invalid_name(
                self.as_str(),
                format!("resolves outside {}", root.display()),
            ));
        }
        Ok(path)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a version requested by the host before it reaches p4
///
/// Versions end up after `@` in a file spec, so they get the same
/// allow-list as name segments.
pub fn validate_version(version: &str) -> RegistryResult<()> {
    let ok = !version.is_empty()
        && !version.starts_with(['-', '.'])
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));
    if ok {
        Ok(())
    } else {
        Err(RegistryError::InvalidVersion {
            version: version.to_string(),
            reason: "only letters, digits and . _ - + are allowed, not leading - or .".to_string(),
        })
    }
}

fn check_segment(name: &str, segment: &str) -> RegistryResult<()> {
    if segment.is_empty() {
        return Err(RegistryError::invalid_name(name, "empty path segment"));
    }
    if segment.chars().all(|c| c == '.') {
        return Err(RegistryError::invalid_name(
            name,
            format!("segment '{}' is not allowed", segment),
        ));
    }
    if !segment.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(RegistryError::invalid_name(
            name,
            format!("segment '{}' must start with a letter or digit", segment),
        ));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(RegistryError::invalid_name(
            name,
            format!("character '{}' is not allowed", bad),
        ));
    }
    Ok(())
}
