// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linux backend: `smbclient -L` and `mount -t cifs`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use smbcheck_core::{
    CapabilityProbe, CommandRunner, MountOutcome, MountRequest, Platform, PlatformKind,
    ServiceStatus, ShareListing, SmbError,
};
use tracing::{debug, info};

use crate::credentials::CredentialsFile;
use crate::listing::listing_from;
use crate::{PlatformSettings, ensure_mount_point};

/// CIFS client tools; any one of them is enough.
pub const SMB_TOOLS: [&str; 3] = ["smbclient", "mount.cifs", "smbmount"];

/// Package manager commands for the common distributions.
pub const INSTALL_HINT: &str = "\
Ubuntu/Debian: sudo apt-get install cifs-utils smbclient
CentOS/RHEL: sudo yum install cifs-utils samba-client
Fedora: sudo dnf install cifs-utils samba-client";

pub struct LinuxPlatform {
    runner: Arc<dyn CommandRunner>,
    settings: PlatformSettings,
    uid: u32,
    gid: u32,
}

impl LinuxPlatform {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: PlatformSettings) -> Self {
        let (uid, gid) = current_ids();
        Self {
            runner,
            settings,
            uid,
            gid,
        }
    }

    /// Owner applied to the mounted files instead of the current user.
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = uid;
        self.gid = gid;
        self
    }

    fn mount_command(&self, mut args: Vec<String>) -> (&'static str, Vec<String>) {
        if self.settings.use_sudo {
            args.insert(0, "mount".to_string());
            ("sudo", args)
        } else {
            ("mount", args)
        }
    }
}

#[cfg(unix)]
fn current_ids() -> (u32, u32) {
    // SAFETY: getuid/getgid take no arguments and cannot fail.
    unsafe { (libc::getuid(), libc::getgid()) }
}

#[cfg(not(unix))]
fn current_ids() -> (u32, u32) {
    (0, 0)
}

#[async_trait]
impl Platform for LinuxPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Linux
    }

    fn capability_probes(&self) -> Vec<CapabilityProbe> {
        SMB_TOOLS
            .iter()
            .map(|name| CapabilityProbe::Tool {
                name: name.to_string(),
                hint: Some(INSTALL_HINT.to_string()),
            })
            .collect()
    }

    async fn query_service_status(&self, name: &str) -> ServiceStatus {
        ServiceStatus::Error(format!("no service check for `{name}` on Linux"))
    }

    async fn list_smb_features(&self) -> Result<String, SmbError> {
        Err(SmbError::CapabilityMissing(
            "optional feature report is only available on Windows".to_string(),
        ))
    }

    async fn tool_present(&self, name: &str) -> bool {
        self.runner.locate(name).is_some()
    }

    async fn list_remote_shares(&self, server: &str) -> Result<ShareListing, SmbError> {
        let args = vec!["-L".to_string(), server.to_string(), "-N".to_string()];
        let result = self
            .runner
            .run("smbclient", &args, self.settings.query_timeout)
            .await;
        listing_from(result, &["Disk", "IPC"])
    }

    async fn mount(&self, request: &MountRequest) -> Result<MountOutcome, SmbError> {
        let mount_point = request
            .mount_point
            .clone()
            .unwrap_or_else(|| self.settings.linux_mount_root.join(&request.share));
        ensure_mount_point(&mount_point).await?;

        // Held until the mount command returns; dropping it deletes the file.
        let credentials_file = match &request.credentials {
            Some(creds) if !creds.username.is_empty() => Some(CredentialsFile::create(creds)?),
            _ => None,
        };
        let auth = match &credentials_file {
            Some(file) => format!("credentials={}", file.path().display()),
            None => "guest".to_string(),
        };

        let target = format!("//{}/{}", request.server, request.share);
        let (program, args) = self.mount_command(vec![
            "-t".to_string(),
            "cifs".to_string(),
            target.clone(),
            mount_point.display().to_string(),
            "-o".to_string(),
            format!("{auth},uid={},gid={}", self.uid, self.gid),
        ]);
        debug!(command = %format!("{program} {}", args.join(" ")), "mounting share");

        let result = self
            .runner
            .run(program, &args, self.settings.mount_timeout)
            .await;
        drop(credentials_file);

        let output = result.map_err(|e| SmbError::Mount(e.to_string()))?;
        if !output.success() {
            return Err(SmbError::Mount(format!(
                "failed to mount share: {}",
                output.diagnostic()
            )));
        }

        info!(%target, mount_point = %mount_point.display(), "share mounted");
        Ok(MountOutcome {
            target,
            location: mount_point.display().to_string(),
        })
    }

    fn default_mount_point(&self, share: &str) -> Option<PathBuf> {
        Some(self.settings.linux_mount_root.join(share))
    }
}
