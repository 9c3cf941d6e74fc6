//! In-memory stand-in for a p4 server used by unit tests

use crate::error::{RegistryError, RegistryResult};
use crate::vcs::runner::{CommandRunner, Invocation};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

struct Label {
    name: String,
    change: u64,
    updated: u32,
}

struct DepotState {
    client: String,
    client_source: String,
    labels: Vec<Label>,
    noise: Vec<String>,
    head: Option<u64>,
    changes_output: Option<String>,
    failing: Option<String>,
    files: Vec<(String, String)>,
}

/// Answers p4 invocations from a scripted depot and records every call
pub(crate) struct FakeDepot {
    state: Mutex<DepotState>,
    calls: Mutex<Vec<Invocation>>,
    delay: Duration,
}

impl FakeDepot {
    pub fn new(client: &str) -> Self {
        Self {
            state: Mutex::new(DepotState {
                client: client.to_string(),
                client_source: "set".to_string(),
                labels: Vec::new(),
                noise: Vec::new(),
                head: None,
                changes_output: None,
                failing: None,
                files: Vec::new(),
            }),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_client_source(self, source: &str) -> Self {
        self.state.lock().unwrap().client_source = source.to_string();
        self
    }

    pub fn with_label(self, name: &str, change: u64) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let updated = state.labels.len() as u32;
            state.labels.push(Label {
                name: name.to_string(),
                change,
                updated,
            });
        }
        self
    }

    /// Point an existing label at another change, as `p4 tag` would
    pub fn retag(&self, name: &str, change: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(label) = state.labels.iter_mut().find(|l| l.name == name) {
            label.change = change;
            label.updated += 1;
        }
    }

    pub fn with_noise(self, line: &str) -> Self {
        self.state.lock().unwrap().noise.push(line.to_string());
        self
    }

    pub fn with_head(self, change: u64) -> Self {
        self.state.lock().unwrap().head = Some(change);
        self
    }

    /// Answer every `changes` query with `text` verbatim
    pub fn with_changes_output(self, text: &str) -> Self {
        self.state.lock().unwrap().changes_output = Some(text.to_string());
        self
    }

    /// Fail every command whose arguments (minus `-c <ws>`) start with `prefix`
    pub fn failing(self, prefix: &str) -> Self {
        self.state.lock().unwrap().failing = Some(prefix.to_string());
        self
    }

    /// Files written (read-only) into the synced directory
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .push((relative.to_string(), contents.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose subcommand is `name`
    pub fn count(&self, name: &str) -> usize {
        self.invocations()
            .iter()
            .filter(|inv| subcommand(&inv.args).first().map(String::as_str) == Some(name))
            .count()
    }

    /// Values written with `p4 set P4CLIENT=<value>`, in order
    pub fn client_sets(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .filter_map(|inv| match inv.args.as_slice() {
                [set, assignment] if set == "set" => {
                    assignment.strip_prefix("P4CLIENT=").map(str::to_string)
                }
                _ => None,
            })
            .collect()
    }

    pub fn current_client(&self) -> String {
        self.state.lock().unwrap().client.clone()
    }

    fn respond(&self, command: &str, args: &[String]) -> RegistryResult<String> {
        let mut state = self.state.lock().unwrap();

        if let Some(prefix) = &state.failing {
            if args.join(" ").starts_with(prefix.as_str()) {
                return Err(RegistryError::command_stderr(command, "TCP receive failed"));
            }
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["set", "P4CLIENT"] => Ok(format!(
                "P4CLIENT={} ({})\n",
                state.client, state.client_source
            )),
            ["set", assignment] => {
                let value = assignment.strip_prefix("P4CLIENT=").unwrap_or_default();
                state.client = value.to_string();
                state.client_source = "set".to_string();
                Ok(String::new())
            }
            ["labels", "-t", _] => {
                let mut out = String::new();
                for line in &state.noise {
                    out.push_str(line);
                    out.push('\n');
                }
                for label in &state.labels {
                    out.push_str(&format!(
                        "Label {} 2024/01/15 10:{:02}:{:02} 'Created by jdoe. '\n",
                        label.name,
                        label.updated / 60,
                        label.updated % 60
                    ));
                }
                Ok(out)
            }
            ["changes", "-m", "1", _] if state.changes_output.is_some() => {
                Ok(state.changes_output.clone().unwrap_or_default())
            }
            ["changes", "-m", "1", spec] => {
                let change = match spec.rsplit_once('@') {
                    Some((_, label)) => state
                        .labels
                        .iter()
                        .find(|l| l.name == label)
                        .map(|l| l.change),
                    None => state.head,
                };
                Ok(change
                    .map(|n| format!("Change {} on 2024/02/11 by jdoe@pkg_ws 'Update '\n", n))
                    .unwrap_or_default())
            }
            ["sync", "-f", spec] => {
                let spec = spec.split_once('@').map_or(*spec, |(path, _)| path);
                let dir = spec.trim_end_matches("...").replace("%40", "@");
                write_files(Path::new(&dir), &state.files);
                Ok(format!("{} - refreshing\n", spec))
            }
            _ => Err(RegistryError::command_stderr(command, "unknown command")),
        }
    }
}

fn subcommand(args: &[String]) -> &[String] {
    if args.first().map(String::as_str) == Some("-c") {
        &args[2..]
    } else {
        args
    }
}

fn write_files(dir: &Path, files: &[(String, String)]) {
    for (relative, contents) in files {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();
    }
}

#[async_trait]
impl CommandRunner for FakeDepot {
    async fn run(&self, invocation: &Invocation) -> RegistryResult<String> {
        self.calls.lock().unwrap().push(invocation.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.respond(&invocation.command_line(), subcommand(&invocation.args))
    }
}
