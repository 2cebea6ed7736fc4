// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for smbcheck.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level smbcheck configuration.
///
/// All sections are optional and default to the values the tool has always
/// used (port 445, 5 s connect timeout, 100,000 PBKDF2 iterations).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmbCheckConfig {
    /// Logging and output settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Reachability probe settings.
    #[serde(default)]
    pub network: NetworkConfig,

    /// External command settings.
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Credential vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Default mount locations.
    #[serde(default)]
    pub mount: MountConfig,
}

/// Logging and output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Colored output when stdout is a terminal.
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            color: true,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

/// Reachability probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// TCP port probed on the target host.
    #[serde(default = "default_smb_port")]
    pub smb_port: u16,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl NetworkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            smb_port: default_smb_port(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_smb_port() -> u16 {
    445
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// External command configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    /// Timeout for status queries and share listing, in seconds.
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Timeout for feature reports and mount commands, in seconds.
    #[serde(default = "default_mount_timeout_secs")]
    pub mount_timeout_secs: u64,

    /// Prefix the Linux mount command with `sudo`.
    #[serde(default = "default_true")]
    pub use_sudo: bool,
}

impl CommandsConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn mount_timeout(&self) -> Duration {
        Duration::from_secs(self.mount_timeout_secs)
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: default_query_timeout_secs(),
            mount_timeout_secs: default_mount_timeout_secs(),
            use_sudo: true,
        }
    }
}

fn default_query_timeout_secs() -> u64 {
    10
}

fn default_mount_timeout_secs() -> u64 {
    15
}

/// Credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Issue tokens keyed with the shared fixed salt instead of a random
    /// per-token salt. Only for interop with older tokens.
    #[serde(default)]
    pub legacy_fixed_salt: bool,

    /// Reject tokens older than this many seconds. `None` disables the check.
    #[serde(default)]
    pub token_ttl_secs: Option<u64>,

    /// Number of token characters shown in progress output.
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            legacy_fixed_salt: false,
            token_ttl_secs: None,
            preview_len: default_preview_len(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    100_000
}

fn default_preview_len() -> usize {
    50
}

/// Default mount locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MountConfig {
    /// Parent directory for Linux mount points.
    #[serde(default = "default_root_linux")]
    pub default_root_linux: String,

    /// Parent directory for macOS mount points.
    #[serde(default = "default_root_macos")]
    pub default_root_macos: String,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            default_root_linux: default_root_linux(),
            default_root_macos: default_root_macos(),
        }
    }
}

fn default_root_linux() -> String {
    "/mnt".to_string()
}

fn default_root_macos() -> String {
    "/Volumes".to_string()
}
