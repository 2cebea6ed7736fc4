// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OS backends for smbcheck.
//!
//! Each supported OS gets one [`Platform`] implementation that builds the
//! native command lines (`sc`, `net`, `smbutil`, `smbclient`, `mount`) and
//! runs them through an injected [`CommandRunner`]. The backend is picked
//! once at startup by [`detect_platform`].

pub mod credentials;
pub mod linux;
pub mod listing;
pub mod macos;
pub mod reachability;
pub mod runner;
pub mod unsupported;
pub mod windows;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use smbcheck_config::SmbCheckConfig;
use smbcheck_core::{CommandRunner, HostInfo, Platform, PlatformKind, SmbError};
use tracing::{debug, info};

pub use credentials::CredentialsFile;
pub use linux::LinuxPlatform;
pub use macos::MacOsPlatform;
pub use reachability::{check_reachable, is_reachable};
pub use runner::SystemRunner;
pub use unsupported::UnsupportedPlatform;
pub use windows::WindowsPlatform;

/// Timeouts and mount defaults shared by the backends.
#[derive(Debug, Clone)]
pub struct PlatformSettings {
    /// Service queries, tool probes and share listings.
    pub query_timeout: Duration,
    /// Feature reports and mount commands.
    pub mount_timeout: Duration,
    /// Prefix the Linux mount with `sudo`.
    pub use_sudo: bool,
    pub linux_mount_root: PathBuf,
    pub macos_mount_root: PathBuf,
}

impl PlatformSettings {
    pub fn from_config(config: &SmbCheckConfig) -> Self {
        Self {
            query_timeout: config.commands.query_timeout(),
            mount_timeout: config.commands.mount_timeout(),
            use_sudo: config.commands.use_sudo,
            linux_mount_root: PathBuf::from(&config.mount.default_root_linux),
            macos_mount_root: PathBuf::from(&config.mount.default_root_macos),
        }
    }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self::from_config(&SmbCheckConfig::default())
    }
}

/// Pick the backend for the OS this binary was built for.
pub fn detect_platform(
    runner: Arc<dyn CommandRunner>,
    config: &SmbCheckConfig,
) -> Arc<dyn Platform> {
    let platform = platform_for(std::env::consts::OS, runner, config);
    info!(platform = %platform.kind(), "platform selected");
    platform
}

/// Pick the backend for `os` (a `std::env::consts::OS` value).
pub fn platform_for(
    os: &str,
    runner: Arc<dyn CommandRunner>,
    config: &SmbCheckConfig,
) -> Arc<dyn Platform> {
    let settings = PlatformSettings::from_config(config);
    match os {
        "windows" => Arc::new(WindowsPlatform::new(runner, settings)),
        "macos" => Arc::new(MacOsPlatform::new(runner, settings)),
        "linux" => Arc::new(LinuxPlatform::new(runner, settings)),
        other => Arc::new(UnsupportedPlatform::new(other)),
    }
}

/// Gather the banner details for this host.
///
/// The OS version comes from `ver` on Windows, `sw_vers` on macOS and
/// `uname -r` elsewhere; it reads `unknown` if the command fails.
pub async fn host_info(runner: &dyn CommandRunner, kind: &PlatformKind) -> HostInfo {
    let (program, args): (&str, Vec<String>) = match kind {
        PlatformKind::Windows => ("cmd", vec!["/C".into(), "ver".into()]),
        PlatformKind::MacOs => ("sw_vers", vec!["-productVersion".into()]),
        _ => ("uname", vec!["-r".into()]),
    };

    let os_version = match runner.run(program, &args, Duration::from_secs(5)).await {
        Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
            output.stdout.trim().to_string()
        }
        Ok(output) => {
            debug!(program, status = ?output.status, "version query failed");
            "unknown".to_string()
        }
        Err(e) => {
            debug!(program, error = %e, "version query failed");
            "unknown".to_string()
        }
    };

    let os_name = match kind {
        PlatformKind::Unsupported(os) => os.clone(),
        known => known.to_string(),
    };

    HostInfo {
        os_name,
        os_version,
        arch: std::env::consts::ARCH.to_string(),
    }
}

/// Create `path` (and parents) if it does not exist yet.
pub(crate) async fn ensure_mount_point(path: &Path) -> Result<(), SmbError> {
    tokio::fs::create_dir_all(path).await.map_err(|e| {
        SmbError::Mount(format!(
            "cannot create mount point {}: {e}",
            path.display()
        ))
    })
}

/// Render a command line for logs with `secret` masked wherever it appears.
pub(crate) fn redacted_command_line(program: &str, args: &[String], secret: Option<&str>) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        match secret {
            Some(s) if !s.is_empty() && arg.contains(s) => line.push_str(&arg.replace(s, "****")),
            _ => line.push_str(arg),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbcheck_test_utils::{MockRunner, ok};

    fn runner() -> Arc<dyn CommandRunner> {
        Arc::new(MockRunner::new())
    }

    #[test]
    fn selects_backend_by_os_name() {
        let config = SmbCheckConfig::default();
        assert_eq!(platform_for("windows", runner(), &config).kind(), PlatformKind::Windows);
        assert_eq!(platform_for("macos", runner(), &config).kind(), PlatformKind::MacOs);
        assert_eq!(platform_for("linux", runner(), &config).kind(), PlatformKind::Linux);
        assert_eq!(
            platform_for("freebsd", runner(), &config).kind(),
            PlatformKind::Unsupported("freebsd".to_string())
        );
    }

    #[test]
    fn settings_follow_config() {
        let mut config = SmbCheckConfig::default();
        config.commands.query_timeout_secs = 3;
        config.commands.use_sudo = false;
        config.mount.default_root_linux = "/media".to_string();

        let settings = PlatformSettings::from_config(&config);
        assert_eq!(settings.query_timeout, Duration::from_secs(3));
        assert_eq!(settings.mount_timeout, Duration::from_secs(15));
        assert!(!settings.use_sudo);
        assert_eq!(settings.linux_mount_root, PathBuf::from("/media"));
    }

    #[tokio::test]
    async fn host_info_reads_version_from_uname() {
        let runner = MockRunner::new();
        runner.push_output("uname", ok("6.8.0-45-generic\n")).await;

        let info = host_info(&runner, &PlatformKind::Linux).await;
        assert_eq!(info.os_name, "Linux");
        assert_eq!(info.os_version, "6.8.0-45-generic");
        assert_eq!(info.arch, std::env::consts::ARCH);
    }

    #[tokio::test]
    async fn host_info_tolerates_missing_version_command() {
        let runner = MockRunner::new();
        let info = host_info(&runner, &PlatformKind::Windows).await;
        assert_eq!(info.os_version, "unknown");
    }

    #[test]
    fn command_line_masks_secret() {
        let args = vec![
            "use".to_string(),
            "Z:".to_string(),
            "/user:alice".to_string(),
            "S3cret!".to_string(),
        ];
        assert_eq!(
            redacted_command_line("net", &args, Some("S3cret!")),
            "net use Z: /user:alice ****"
        );
        assert_eq!(
            redacted_command_line("net", &args[..2], None),
            "net use Z:"
        );
    }
}
