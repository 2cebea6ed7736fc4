// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process execution for the real platforms.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use smbcheck_core::{CommandOutput, CommandRunner, SmbError};
use tracing::debug;

/// Runs programs with `tokio::process`, capturing their output.
///
/// The child is killed if the deadline passes or the calling future is
/// dropped. Stdin is closed so a command can never block on the console.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, SmbError> {
        let spawn_error = |e: std::io::Error| SmbError::Command {
            program: program.to_string(),
            reason: e.to_string(),
        };

        // Arguments may carry passwords; callers log their own redacted form.
        debug!(program, argc = args.len(), ?timeout, "spawning");

        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(spawn_error)?,
            Err(_) => {
                debug!(program, "timed out, child killed");
                return Err(SmbError::Timeout { duration: timeout });
            }
        };

        let output = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, status = ?output.status, "finished");
        Ok(output)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
