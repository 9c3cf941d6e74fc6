//! External process execution
//!
//! Every p4 call goes through a [`CommandRunner`]. The production
//! implementation spawns the program directly (never through a shell),
//! bounds it with a timeout and force-kills it when the timeout fires.

use crate::error::{RegistryError, RegistryResult};
use crate::vcs::classify::classify_output;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute
    pub program: String,
    /// Arguments, passed verbatim as argv entries
    pub args: Vec<String>,
    /// Working directory of the child
    pub cwd: PathBuf,
    /// Wall-clock limit before the child is killed
    pub timeout: Duration,
}

impl Invocation {
    /// Human-readable command line for logs and error messages
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Abstract process execution
///
/// Resolves with captured stdout, or fails with a classified error.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run one external process to completion
    async fn run(&self, invocation: &Invocation) -> RegistryResult<String>;
}

/// Runs commands with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> RegistryResult<String> {
        let command = invocation.command_line();
        debug!("Executing: {} (cwd {})", command, invocation.cwd.display());

        // Dropping the child on timeout sends SIGKILL / TerminateProcess.
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RegistryError::command_spawn(&command, e))?;

        let output = match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await
        {
            Ok(result) => result.map_err(|e| RegistryError::command_spawn(&command, e))?,
            Err(_) => {
                warn!(
                    "{} did not finish within {:?}, killing it",
                    command, invocation.timeout
                );
                return Err(RegistryError::CommandTimeout {
                    command,
                    timeout: invocation.timeout,
                });
            }
        };

        classify_output(&command, &output)
    }
}
