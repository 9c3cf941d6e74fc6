//! Error types for p4reg
//!
//! All modules use `RegistryResult<T>` as their return type. Every error
//! is classified once, at construction, into an [`ErrorKind`]; callers
//! ask the error whether it is retriable instead of inspecting it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Broad classification used by the host to decide what to do with a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local precondition violated (bad package name, unsupported binding)
    Validation,
    /// An invocation of the external VCS tool failed
    Vcs,
    /// Configuration missing or invalid
    Config,
    /// Local filesystem failure
    Io,
    /// Bug or unexpected internal state
    Internal,
}

/// All errors that can occur in p4reg
#[derive(Error, Debug)]
pub enum RegistryError {
    // Validation errors
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Unsupported P4CLIENT binding: {0}")]
    UnsupportedWorkspaceBinding(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Missing required configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    ConfigValue { key: &'static str, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // VCS command errors
    #[error("Failed to run {command}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} timed out after {}s and was killed", timeout.as_secs())]
    CommandTimeout { command: String, timeout: Duration },

    #[error("{command} was terminated by a signal")]
    CommandSignaled { command: String },

    #[error("{command} exited with status {code}: {stderr}")]
    CommandExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("{command} reported an error: {stderr}")]
    CommandStderr { command: String, stderr: String },

    #[error("Unexpected output from {command}: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Sync of {} failed: {source}", path.display())]
    Sync {
        path: PathBuf,
        #[source]
        source: Arc<RegistryError>,
    },

    // Manifest errors
    #[error("Invalid package manifest {}: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl RegistryError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid package name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPackageName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a spawn failure error
    pub fn command_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawn {
            command: command.into(),
            source,
        }
    }

    /// Create an error for a command that wrote to stderr
    pub fn command_stderr(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandStderr {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create an unexpected-output error
    pub fn unexpected_output(command: impl Into<String>, output: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            command: command.into(),
            output: output.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPackageName { .. }
            | Self::InvalidVersion { .. }
            | Self::UnsupportedWorkspaceBinding(_) => ErrorKind::Validation,
            Self::ConfigInvalid { .. }
            | Self::ConfigMissing(_)
            | Self::ConfigValue { .. }
            | Self::ConfigDirCreate { .. }
            | Self::TomlParse(_)
            | Self::TomlSerialize(_) => ErrorKind::Config,
            Self::CommandSpawn { .. }
            | Self::CommandTimeout { .. }
            | Self::CommandSignaled { .. }
            | Self::CommandExit { .. }
            | Self::CommandStderr { .. }
            | Self::UnexpectedOutput { .. } => ErrorKind::Vcs,
            Self::Sync { source, .. } => source.kind(),
            Self::ManifestInvalid { .. } | Self::Io { .. } | Self::Json(_) => ErrorKind::Io,
            Self::Internal(_) | Self::User(_) => ErrorKind::Internal,
        }
    }

    /// Check if the host may retry the whole operation
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Vcs
    }

    /// Whether the source chain carries nothing useful beyond the message
    pub fn suppresses_trace(&self) -> bool {
        match self {
            Self::CommandStderr { .. } => true,
            Self::Sync { source, .. } => source.suppresses_trace(),
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedWorkspaceBinding(_) => {
                Some("Set the client with: p4 set P4CLIENT=<name>")
            }
            Self::ConfigMissing(_) => Some("Run: p4reg configure"),
            Self::CommandSpawn { .. } => Some("Check that p4 is installed and registry.p4_program is correct"),
            Self::CommandTimeout { .. } => Some("Raise registry.timeout_secs or check the server connection"),
            Self::Sync { source, .. } => source.hint(),
            _ => None,
        }
    }
}
