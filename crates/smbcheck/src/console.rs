// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal input for the interactive flows.
//!
//! Visible answers go through rustyline, secrets through rpassword. Both
//! block, so each prompt runs on the blocking pool.

use std::io::{BufRead, IsTerminal};

use async_trait::async_trait;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use smbcheck_core::{InputProvider, SmbError};
use zeroize::Zeroizing;

/// Reads answers from the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleInput;

impl ConsoleInput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InputProvider for ConsoleInput {
    async fn read_line(&self, prompt: &str) -> Result<String, SmbError> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || read_line_blocking(&prompt))
            .await
            .map_err(|e| SmbError::Internal(format!("input task failed: {e}")))?
    }

    async fn read_secret(&self, prompt: &str) -> Result<String, SmbError> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || read_secret_blocking(&prompt))
            .await
            .map_err(|e| SmbError::Internal(format!("input task failed: {e}")))?
    }
}

fn read_line_blocking(prompt: &str) -> Result<String, SmbError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| SmbError::Internal(format!("failed to initialize readline: {e}")))?;
    match rl.readline(prompt) {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Err(SmbError::Cancelled),
        Err(e) => Err(SmbError::Input(e.to_string())),
    }
}

fn read_secret_blocking(prompt: &str) -> Result<String, SmbError> {
    if !std::io::stdin().is_terminal() {
        // Piped input: no echo to suppress.
        let mut line = Zeroizing::new(String::new());
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| SmbError::Input(e.to_string()))?;
        if read == 0 {
            return Err(SmbError::Cancelled);
        }
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }
    rpassword::prompt_password(prompt).map_err(|e| match e.kind() {
        std::io::ErrorKind::Interrupted | std::io::ErrorKind::UnexpectedEof => {
            SmbError::Cancelled
        }
        _ => SmbError::Input(format!("failed to read {}: {e}", prompt.trim().trim_end_matches(':'))),
    })
}
