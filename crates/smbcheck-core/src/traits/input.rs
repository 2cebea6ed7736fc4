// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator input port.

use async_trait::async_trait;

use crate::error::SmbError;

/// Source of operator answers for the interactive workflow.
///
/// Returned strings are raw (untrimmed). An interrupt at the prompt must be
/// reported as [`SmbError::Cancelled`].
#[async_trait]
pub trait InputProvider: Send + Sync {
    /// Ask a question with visible echo.
    async fn read_line(&self, prompt: &str) -> Result<String, SmbError>;

    /// Ask for a secret without echo.
    async fn read_secret(&self, prompt: &str) -> Result<String, SmbError>;
}
