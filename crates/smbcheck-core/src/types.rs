// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the platform backends, the vault, and the workflow.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A username/password pair.
///
/// Exists only in memory, or as the plaintext payload on either side of the
/// vault. The password never appears in `Debug` output and both fields are
/// zeroed on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,
}

impl CredentialRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// State of a platform SMB service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    Stopped,
    NotFound,
    Error(String),
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Running => f.write_str("Running"),
            ServiceStatus::Stopped => f.write_str("Stopped"),
            ServiceStatus::NotFound => f.write_str("Not found"),
            ServiceStatus::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// The stages of the diagnose-and-mount workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum WorkflowStage {
    CapabilityCheck,
    ReachabilityCheck,
    ShareListing,
    CredentialAcquisition,
    MountInvocation,
}

/// Operating system family the tool is running on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformKind {
    Windows,
    MacOs,
    Linux,
    /// Any other OS, carrying the runtime OS identifier.
    Unsupported(String),
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Windows => f.write_str("Windows"),
            PlatformKind::MacOs => f.write_str("macOS"),
            PlatformKind::Linux => f.write_str("Linux"),
            PlatformKind::Unsupported(os) => write!(f, "unsupported ({os})"),
        }
    }
}

/// Host information shown in the banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os_name: String,
    pub os_version: String,
    pub arch: String,
}

/// Captured result of an external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Trimmed stderr, falling back to stdout, for error messages.
    pub fn diagnostic(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_string()
        } else {
            err.to_string()
        }
    }
}

/// One capability check a platform asks the doctor to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityProbe {
    /// A service whose status is queried. `required` services count towards
    /// readiness; the others are informational.
    Service {
        name: String,
        required: bool,
        hint: Option<String>,
    },
    /// An executable that must be on `PATH`. Any present tool counts towards
    /// readiness.
    Tool { name: String, hint: Option<String> },
    /// Best-effort optional feature report (never affects readiness).
    FeatureReport,
}

/// Result of enumerating the shares of a remote server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareListing {
    /// Unfiltered command output.
    pub raw: String,
    /// Lines describing shares, trimmed.
    pub shares: Vec<String>,
}

/// Everything the platform needs to mount a share.
#[derive(Debug, Clone)]
pub struct MountRequest {
    pub server: String,
    pub share: String,
    /// `None` for anonymous access.
    pub credentials: Option<CredentialRecord>,
    pub mount_point: Option<PathBuf>,
}

impl MountRequest {
    /// UNC form of the target, e.g. `\\server\share`.
    pub fn unc_path(&self) -> String {
        format!(r"\\{}\{}", self.server, self.share)
    }
}

/// Where a successful mount landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOutcome {
    /// The remote target, e.g. `//server/share`.
    pub target: String,
    /// Drive letter (Windows) or mount point path.
    pub location: String,
}
