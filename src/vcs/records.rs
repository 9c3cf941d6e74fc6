//! Parsing of p4 text output

use crate::error::{RegistryError, RegistryResult};

/// One line of `p4 changes` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Changelist number
    pub number: u64,
    /// The full record line, used as hash input
    pub line: String,
}

/// Extract the label name from a `p4 labels` line
///
/// Lines look like `Label 1.2.0 2024/03/01 'Release 1.2.0 '`, with a
/// time after the date when listed with `-t`. Returns `None` for anything
/// else.
pub fn parse_label_line(line: &str) -> Option<&str> {
    let mut parts = line.trim().splitn(4, ' ');
    if parts.next()? != "Label" {
        return None;
    }
    let name = parts.next()?;
    let date = parts.next()?;
    if name.is_empty() || !is_p4_date(date) {
        return None;
    }
    Some(name)
}

/// Parse the first change record from `p4 changes -m 1` output
pub fn parse_change(output: &str) -> Option<ChangeRecord> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let mut parts = line.split(' ');
        if parts.next()? != "Change" {
            return None;
        }
        let number = parts.next()?.parse().ok()?;
        if parts.next()? != "on" {
            return None;
        }
        Some(ChangeRecord {
            number,
            line: line.to_string(),
        })
    })
}

/// Parse `p4 set P4CLIENT` output into the bound client name
///
/// Only values that `p4 set` itself manages can be saved and restored;
/// environment or P4CONFIG-derived bindings are rejected.
pub fn parse_client_binding(output: &str) -> RegistryResult<String> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| RegistryError::UnsupportedWorkspaceBinding("P4CLIENT is not set".to_string()))?;

    let value = line.strip_prefix("P4CLIENT=").ok_or_else(|| {
        RegistryError::UnsupportedWorkspaceBinding(format!("unrecognized output '{}'", line))
    })?;

    let (name, source) = match value.split_once(" (") {
        Some((name, rest)) => (name, rest.strip_suffix(')').unwrap_or(rest)),
        None => (value, "set"),
    };

    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(RegistryError::UnsupportedWorkspaceBinding(format!(
            "'{}' is not a single client name",
            value
        )));
    }

    match source {
        "set" | "set -s" => Ok(name.to_string()),
        other => Err(RegistryError::UnsupportedWorkspaceBinding(format!(
            "P4CLIENT={} comes from {}, only values managed by `p4 set` are supported",
            name, other
        ))),
    }
}

fn is_p4_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'/'
        && b[7] == b'/'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}
