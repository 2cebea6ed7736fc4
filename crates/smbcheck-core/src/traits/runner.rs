// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External process execution.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SmbError;
use crate::types::CommandOutput;

/// Runs external programs on behalf of a platform backend.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing output.
    ///
    /// Returns the captured output whatever the exit status. Fails with
    /// [`SmbError::Command`] when the process cannot be spawned and with
    /// [`SmbError::Timeout`] when it outlives `timeout` (the process is killed).
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, SmbError>;

    /// Resolve an executable on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}
