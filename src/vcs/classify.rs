//! Failure classification for external commands
//!
//! p4 can report a soft failure on stderr while still exiting 0, so a
//! populated error stream counts as failure regardless of exit status.

use crate::error::{RegistryError, RegistryResult};
use std::process::Output;

/// Turn a finished process into stdout or a classified error
pub fn classify_output(command: &str, output: &Output) -> RegistryResult<String> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        return Err(match output.status.code() {
            Some(code) => RegistryError::CommandExit {
                command: command.to_string(),
                code,
                stderr,
            },
            None => RegistryError::CommandSignaled {
                command: command.to_string(),
            },
        });
    }

    if !stderr.is_empty() {
        return Err(RegistryError::command_stderr(command, stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
