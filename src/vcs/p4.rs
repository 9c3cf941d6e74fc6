//! The p4 commands used by the registry
//!
//! Each method builds one argv-style [`Invocation`]; nothing is ever
//! interpolated into a shell string. File arguments use local syntax
//! with Perforce's reserved characters escaped.

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::vcs::records::{parse_change, ChangeRecord};
use crate::vcs::runner::{CommandRunner, Invocation};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Handle for issuing p4 commands against one registry root
#[derive(Clone)]
pub struct P4 {
    runner: Arc<dyn CommandRunner>,
    program: String,
    workspace: String,
    cwd: PathBuf,
    timeout: Duration,
}

impl fmt::Debug for P4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("P4")
            .field("program", &self.program)
            .field("workspace", &self.workspace)
            .field("cwd", &self.cwd)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl P4 {
    /// Create a p4 handle rooted at `root`
    pub fn new(runner: Arc<dyn CommandRunner>, config: &RegistryConfig, root: PathBuf) -> Self {
        Self {
            runner,
            program: config.p4_program.clone(),
            workspace: config.workspace.clone(),
            cwd: root,
            timeout: config.timeout(),
        }
    }

    /// Client this registry operates in
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// `p4 set P4CLIENT`
    pub async fn get_client(&self) -> RegistryResult<String> {
        self.run(["set", "P4CLIENT"]).await
    }

    /// `p4 set P4CLIENT=<name>`
    pub async fn set_client(&self, name: &str) -> RegistryResult<()> {
        self.run(["set", &format!("P4CLIENT={}", name)]).await?;
        Ok(())
    }

    /// `p4 -c <ws> labels -t <dir>/...`
    ///
    /// `-t` adds the time of day to each label's update date, so
    /// retagging a label changes the listing.
    pub async fn labels(&self, dir: &Path) -> RegistryResult<String> {
        self.run_in_client(["labels", "-t", &file_spec(dir, None)])
            .await
    }

    /// `p4 -c <ws> changes -m 1 <dir>/...[@label]`
    pub async fn latest_change(
        &self,
        dir: &Path,
        label: Option<&str>,
    ) -> RegistryResult<Option<ChangeRecord>> {
        let spec = file_spec(dir, label);
        let out = self.run_in_client(["changes", "-m", "1", &spec]).await?;
        if out.trim().is_empty() {
            return Ok(None);
        }

        // Text without a change record is a server message, not "no changes"
        parse_change(&out).map(Some).ok_or_else(|| {
            RegistryError::unexpected_output(
                format!("{} -c {} changes -m 1 {}", self.program, self.workspace, spec),
                out.trim(),
            )
        })
    }

    /// `p4 -c <ws> sync -f <dir>/...[@revision]`
    pub async fn sync_force(&self, dir: &Path, revision: Option<&str>) -> RegistryResult<()> {
        self.run_in_client(["sync", "-f", &file_spec(dir, revision)])
            .await?;
        Ok(())
    }

    async fn run_in_client<const N: usize>(&self, args: [&str; N]) -> RegistryResult<String> {
        let mut argv = Vec::with_capacity(N + 2);
        argv.push("-c".to_string());
        argv.push(self.workspace.clone());
        argv.extend(args.iter().map(|a| a.to_string()));
        self.exec(argv).await
    }

    async fn run<const N: usize>(&self, args: [&str; N]) -> RegistryResult<String> {
        self.exec(args.iter().map(|a| a.to_string()).collect()).await
    }

    async fn exec(&self, args: Vec<String>) -> RegistryResult<String> {
        let invocation = Invocation {
            program: self.program.clone(),
            args,
            cwd: self.cwd.clone(),
            timeout: self.timeout,
        };
        let out = self.runner.run(&invocation).await?;
        debug!("{} returned {} bytes", invocation.command_line(), out.len());
        Ok(out)
    }
}

/// Render `<dir>/...[@revision]` with reserved characters escaped
pub fn file_spec(dir: &Path, revision: Option<&str>) -> String {
    let mut spec = escape_path(&dir.join("...").to_string_lossy());
    if let Some(rev) = revision {
        spec.push('@');
        spec.push_str(rev);
    }
    spec
}

/// Escape `%`, `@`, `#` and `*` the way Perforce expects in file names
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '@' => escaped.push_str("%40"),
            '#' => escaped.push_str("%23"),
            '*' => escaped.push_str("%2A"),
            _ => escaped.push(c),
        }
    }
    escaped
}
