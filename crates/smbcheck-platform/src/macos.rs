// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! macOS backend: `smbutil` and `mount -t smbfs`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use smbcheck_core::{
    CapabilityProbe, CommandRunner, MountOutcome, MountRequest, Platform, PlatformKind,
    ServiceStatus, ShareListing, SmbError,
};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::listing::listing_from;
use crate::{PlatformSettings, ensure_mount_point, redacted_command_line};

/// launchd job of the SMB client preferences agent.
pub const SMB_CLIENT_SERVICE: &str = "com.apple.smb.preferences";

/// Characters left as-is in the user-info part of an `smb://` URL.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct MacOsPlatform {
    runner: Arc<dyn CommandRunner>,
    settings: PlatformSettings,
}

impl MacOsPlatform {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: PlatformSettings) -> Self {
        Self { runner, settings }
    }
}

/// Build the `smb://` URL handed to `mount_smbfs`.
///
/// User and password are percent-encoded so `@`, `:` and `/` in them cannot
/// change how the URL is split. An empty username gives an anonymous URL.
pub fn smb_url(request: &MountRequest) -> Zeroizing<String> {
    let user_info = match &request.credentials {
        Some(creds) if !creds.username.is_empty() => {
            let user = utf8_percent_encode(&creds.username, USERINFO);
            if creds.password.is_empty() {
                format!("{user}@")
            } else {
                let pass = utf8_percent_encode(&creds.password, USERINFO);
                format!("{user}:{pass}@")
            }
        }
        _ => String::new(),
    };
    Zeroizing::new(format!(
        "smb://{user_info}{}/{}",
        request.server, request.share
    ))
}

#[async_trait]
impl Platform for MacOsPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::MacOs
    }

    fn capability_probes(&self) -> Vec<CapabilityProbe> {
        vec![
            CapabilityProbe::Tool {
                name: "smbutil".to_string(),
                hint: Some("smbutil ships with macOS; check that /usr/bin is on PATH".to_string()),
            },
            CapabilityProbe::Service {
                name: SMB_CLIENT_SERVICE.to_string(),
                required: false,
                hint: None,
            },
        ]
    }

    async fn query_service_status(&self, name: &str) -> ServiceStatus {
        let args = vec!["list".to_string(), name.to_string()];
        match self
            .runner
            .run("launchctl", &args, self.settings.query_timeout)
            .await
        {
            Ok(output) if output.success() => ServiceStatus::Running,
            Ok(_) => ServiceStatus::NotFound,
            Err(e) => ServiceStatus::Error(e.to_string()),
        }
    }

    async fn list_smb_features(&self) -> Result<String, SmbError> {
        Err(SmbError::CapabilityMissing(
            "optional feature report is only available on Windows".to_string(),
        ))
    }

    async fn tool_present(&self, name: &str) -> bool {
        self.runner.locate(name).is_some()
    }

    /// `smbutil view` output is shown verbatim, so no lines are picked out.
    async fn list_remote_shares(&self, server: &str) -> Result<ShareListing, SmbError> {
        let args = vec!["view".to_string(), format!("//{server}")];
        let result = self
            .runner
            .run("smbutil", &args, self.settings.query_timeout)
            .await;
        listing_from(result, &[])
    }

    async fn mount(&self, request: &MountRequest) -> Result<MountOutcome, SmbError> {
        let mount_point = request
            .mount_point
            .clone()
            .unwrap_or_else(|| self.settings.macos_mount_root.join(&request.share));
        ensure_mount_point(&mount_point).await?;

        let url = smb_url(request);
        let args = vec![
            "-t".to_string(),
            "smbfs".to_string(),
            url.to_string(),
            mount_point.display().to_string(),
        ];
        let secret = request
            .credentials
            .as_ref()
            .map(|c| utf8_percent_encode(&c.password, USERINFO).to_string());
        debug!(
            command = %redacted_command_line("mount", &args, secret.as_deref()),
            "mounting share"
        );

        let output = self
            .runner
            .run("mount", &args, self.settings.mount_timeout)
            .await
            .map_err(|e| SmbError::Mount(e.to_string()))?;
        if !output.success() {
            return Err(SmbError::Mount(format!(
                "failed to mount share: {}",
                output.diagnostic()
            )));
        }

        let target = format!("//{}/{}", request.server, request.share);
        info!(%target, mount_point = %mount_point.display(), "share mounted");
        Ok(MountOutcome {
            target,
            location: mount_point.display().to_string(),
        })
    }

    fn default_mount_point(&self, share: &str) -> Option<PathBuf> {
        Some(self.settings.macos_mount_root.join(share))
    }
}
