// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock command runner for deterministic platform tests.
//!
//! `MockRunner` implements `CommandRunner` with per-program FIFO queues of
//! scripted results and captures every invocation for assertion.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use smbcheck_core::{CommandOutput, CommandRunner, SmbError};

/// One call made through [`MockRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

enum Scripted {
    Output(CommandOutput),
    SpawnFailure(String),
    Timeout,
}

type RunHook = Box<dyn Fn(&str, &[String]) + Send + Sync>;

/// A command runner that never spawns anything.
///
/// Results are queued per program name. A program with nothing queued fails
/// as if it could not be started.
pub struct MockRunner {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    tools: HashSet<String>,
    hook: Option<RunHook>,
}

impl MockRunner {
    /// Create a runner with no scripted results and no tools on `PATH`.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            tools: HashSet::new(),
            hook: None,
        }
    }

    /// Report `name` as present from `locate()`.
    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools.insert(name.to_string());
        self
    }

    /// Call `hook` with the program and arguments of every run, before the
    /// scripted result is returned. Lets a test observe state that only
    /// exists while a command is "running".
    pub fn on_run(mut self, hook: impl Fn(&str, &[String]) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Queue a completed run for `program`.
    pub async fn push_output(&self, program: &str, output: CommandOutput) {
        self.push(program, Scripted::Output(output)).await;
    }

    /// Queue a spawn failure for `program`.
    pub async fn push_spawn_failure(&self, program: &str, reason: &str) {
        self.push(program, Scripted::SpawnFailure(reason.to_string()))
            .await;
    }

    /// Queue a timeout for `program`.
    pub async fn push_timeout(&self, program: &str) {
        self.push(program, Scripted::Timeout).await;
    }

    async fn push(&self, program: &str, scripted: Scripted) {
        self.scripts
            .lock()
            .await
            .entry(program.to_string())
            .or_default()
            .push_back(scripted);
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    /// Number of calls made so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, SmbError> {
        self.calls.lock().await.push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            timeout,
        });

        if let Some(hook) = &self.hook {
            hook(program, args);
        }

        let next = self
            .scripts
            .lock()
            .await
            .get_mut(program)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnFailure(reason)) => Err(SmbError::Command {
                program: program.to_string(),
                reason,
            }),
            Some(Scripted::Timeout) => Err(SmbError::Timeout { duration: timeout }),
            None => Err(SmbError::Command {
                program: program.to_string(),
                reason: "no scripted result".to_string(),
            }),
        }
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.tools
            .contains(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

/// A successful run printing `stdout`.
pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        status: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

/// A run that exited with `code` and printed `stderr`.
pub fn failed(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(code),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_queued_results_in_order() {
        let runner = MockRunner::new();
        runner.push_output("sc", ok("first")).await;
        runner.push_output("sc", failed(1060, "second")).await;

        let first = runner.run("sc", &[], Duration::from_secs(1)).await.unwrap();
        let second = runner.run("sc", &[], Duration::from_secs(1)).await.unwrap();
        assert_eq!(first.stdout, "first");
        assert_eq!(second.status, Some(1060));
    }

    #[tokio::test]
    async fn unscripted_program_fails_to_spawn() {
        let runner = MockRunner::new();
        let err = runner
            .run("mount", &[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SmbError::Command { program, .. } if program == "mount"));
    }

    #[tokio::test]
    async fn records_calls_with_arguments() {
        let runner = MockRunner::new();
        runner.push_timeout("net").await;
        let args = vec!["view".to_string(), r"\\nas".to_string()];
        let err = runner
            .run("net", &args, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SmbError::Timeout { .. }));

        let calls = runner.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, args);
        assert_eq!(calls[0].timeout, Duration::from_secs(10));
    }

    #[test]
    fn locate_reports_configured_tools_only() {
        let runner = MockRunner::new().with_tool("smbclient");
        assert!(runner.locate("smbclient").is_some());
        assert!(runner.locate("mount.cifs").is_none());
    }
}
