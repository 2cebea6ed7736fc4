// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Windows backend: `sc query`, PowerShell feature report, `net view` and
//! `net use`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use smbcheck_core::{
    CapabilityProbe, CommandOutput, CommandRunner, MountOutcome, MountRequest, Platform,
    PlatformKind, ServiceStatus, ShareListing, SmbError,
};
use tracing::{debug, info};

use crate::listing::listing_from;
use crate::{PlatformSettings, redacted_command_line};

/// Server and workstation services; SMB works when either runs.
pub const SMB_SERVICES: [&str; 2] = ["LanmanServer", "LanmanWorkstation"];

const FEATURE_QUERY: &str = "Get-WindowsOptionalFeature -Online | \
    Where-Object {$_.FeatureName -like \"*SMB*\"} | Select-Object FeatureName, State";

type DriveProbe = Arc<dyn Fn(char) -> bool + Send + Sync>;

pub struct WindowsPlatform {
    runner: Arc<dyn CommandRunner>,
    settings: PlatformSettings,
    drive_in_use: DriveProbe,
}

impl WindowsPlatform {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: PlatformSettings) -> Self {
        Self {
            runner,
            settings,
            drive_in_use: Arc::new(|letter: char| Path::new(&format!("{letter}:\\")).exists()),
        }
    }

    /// Replace the check deciding whether a drive letter is taken.
    pub fn with_drive_probe(mut self, probe: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        self.drive_in_use = Arc::new(probe);
        self
    }
}

/// Map `sc query` results onto a service status.
///
/// Exit 0 with `RUNNING` in the output is running, any other exit 0 is
/// stopped, a non-zero exit means the service does not exist.
pub fn service_status_from(result: Result<CommandOutput, SmbError>) -> ServiceStatus {
    match result {
        Ok(output) if output.success() && output.stdout.contains("RUNNING") => {
            ServiceStatus::Running
        }
        Ok(output) if output.success() => ServiceStatus::Stopped,
        Ok(_) => ServiceStatus::NotFound,
        Err(e) => ServiceStatus::Error(e.to_string()),
    }
}

/// First free drive letter scanning from `Z` down to `A`.
pub fn pick_drive_letter(in_use: impl Fn(char) -> bool) -> Option<char> {
    ('A'..='Z').rev().find(|letter| !in_use(*letter))
}

#[async_trait]
impl Platform for WindowsPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Windows
    }

    fn capability_probes(&self) -> Vec<CapabilityProbe> {
        let mut probes: Vec<CapabilityProbe> = SMB_SERVICES
            .iter()
            .map(|name| CapabilityProbe::Service {
                name: name.to_string(),
                required: true,
                hint: Some(format!("To start: sc start {name}")),
            })
            .collect();
        probes.push(CapabilityProbe::FeatureReport);
        probes
    }

    async fn query_service_status(&self, name: &str) -> ServiceStatus {
        let args = vec!["query".to_string(), name.to_string()];
        let result = self
            .runner
            .run("sc", &args, self.settings.query_timeout)
            .await;
        let status = service_status_from(result);
        debug!(service = name, %status, "service queried");
        status
    }

    async fn list_smb_features(&self) -> Result<String, SmbError> {
        let args = vec!["-Command".to_string(), FEATURE_QUERY.to_string()];
        let output = self
            .runner
            .run("powershell", &args, self.settings.mount_timeout)
            .await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(SmbError::Command {
                program: "powershell".to_string(),
                reason: "could not check SMB features (requires admin privileges)".to_string(),
            })
        }
    }

    async fn tool_present(&self, name: &str) -> bool {
        self.runner.locate(name).is_some()
    }

    async fn list_remote_shares(&self, server: &str) -> Result<ShareListing, SmbError> {
        let args = vec!["view".to_string(), format!(r"\\{server}")];
        let result = self
            .runner
            .run("net", &args, self.settings.query_timeout)
            .await;
        listing_from(result, &["Disk"])
    }

    async fn mount(&self, request: &MountRequest) -> Result<MountOutcome, SmbError> {
        let probe = Arc::clone(&self.drive_in_use);
        let letter = pick_drive_letter(|c| probe(c))
            .ok_or_else(|| SmbError::Mount("no available drive letters".to_string()))?;
        let drive = format!("{letter}:");
        let unc = request.unc_path();

        let mut args = vec!["use".to_string(), drive.clone(), unc.clone()];
        let mut secret = None;
        if let Some(creds) = request.credentials.as_ref().filter(|c| !c.username.is_empty()) {
            args.push(format!("/user:{}", creds.username));
            args.push(creds.password.clone());
            secret = Some(creds.password.as_str());
        }
        debug!(command = %redacted_command_line("net", &args, secret), "mapping drive");

        let output = self
            .runner
            .run("net", &args, self.settings.mount_timeout)
            .await
            .map_err(|e| SmbError::Mount(e.to_string()))?;
        if !output.success() {
            return Err(SmbError::Mount(format!(
                "failed to map drive: {}",
                output.diagnostic()
            )));
        }

        info!(%unc, %drive, "drive mapped");
        Ok(MountOutcome {
            target: unc,
            location: drive,
        })
    }

    fn default_mount_point(&self, _share: &str) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbcheck_core::CredentialRecord;
    use smbcheck_test_utils::{MockRunner, failed, ok};
    use tracing_test::traced_test;

    const SC_RUNNING: &str = "\
SERVICE_NAME: LanmanServer
        TYPE               : 20  WIN32_SHARE_PROCESS
        STATE              : 4  RUNNING
                                (STOPPABLE, PAUSABLE, ACCEPTS_SHUTDOWN)
";

    const SC_STOPPED: &str = "\
SERVICE_NAME: LanmanServer
        TYPE               : 20  WIN32_SHARE_PROCESS
        STATE              : 1  STOPPED
";

    fn platform(runner: Arc<MockRunner>) -> WindowsPlatform {
        WindowsPlatform::new(runner, PlatformSettings::default()).with_drive_probe(|_| false)
    }

    fn request(credentials: Option<CredentialRecord>) -> MountRequest {
        MountRequest {
            server: "nas".to_string(),
            share: "media".to_string(),
            credentials,
            mount_point: None,
        }
    }

    #[test]
    fn sc_query_parsing() {
        assert_eq!(service_status_from(Ok(ok(SC_RUNNING))), ServiceStatus::Running);
        assert_eq!(service_status_from(Ok(ok(SC_STOPPED))), ServiceStatus::Stopped);
        assert_eq!(
            service_status_from(Ok(failed(1060, "The specified service does not exist"))),
            ServiceStatus::NotFound
        );
        let spawn = Err(SmbError::Command {
            program: "sc".to_string(),
            reason: "not found".to_string(),
        });
        assert!(matches!(service_status_from(spawn), ServiceStatus::Error(_)));
    }

    #[test]
    fn drive_letters_scan_from_z() {
        assert_eq!(pick_drive_letter(|_| false), Some('Z'));
        assert_eq!(pick_drive_letter(|c| c >= 'X'), Some('W'));
        assert_eq!(pick_drive_letter(|c| c != 'A'), Some('A'));
        assert_eq!(pick_drive_letter(|_| true), None);
    }

    #[test]
    fn probes_cover_both_services_and_features() {
        let windows = platform(Arc::new(MockRunner::new()));
        let probes = windows.capability_probes();
        assert_eq!(probes.len(), 3);
        assert!(matches!(
            &probes[0],
            CapabilityProbe::Service { name, required: true, hint: Some(h) }
                if name == "LanmanServer" && h == "To start: sc start LanmanServer"
        ));
        assert_eq!(probes[2], CapabilityProbe::FeatureReport);
    }

    #[tokio::test]
    async fn service_query_uses_sc() {
        let runner = Arc::new(MockRunner::new());
        runner.push_output("sc", ok(SC_RUNNING)).await;
        let windows = platform(runner.clone());

        assert_eq!(
            windows.query_service_status("LanmanServer").await,
            ServiceStatus::Running
        );
        let calls = runner.calls().await;
        assert_eq!(calls[0].program, "sc");
        assert_eq!(calls[0].args, vec!["query", "LanmanServer"]);
    }

    #[tokio::test]
    async fn feature_report_needs_elevation() {
        let runner = Arc::new(MockRunner::new());
        runner.push_output("powershell", failed(1, "Access denied")).await;
        let err = platform(runner.clone()).list_smb_features().await.unwrap_err();
        assert!(err.to_string().contains("admin"));

        let calls = runner.calls().await;
        assert_eq!(calls[0].args[0], "-Command");
        assert!(calls[0].args[1].contains("Get-WindowsOptionalFeature"));
    }

    #[tokio::test]
    async fn listing_keeps_disk_shares() {
        let runner = Arc::new(MockRunner::new());
        runner
            .push_output("net", ok("media   Disk\nIPC$  IPC\nThe command completed successfully.\n"))
            .await;
        let listing = platform(runner.clone()).list_remote_shares("nas").await.unwrap();
        assert_eq!(listing.shares, vec!["media   Disk"]);
        assert_eq!(runner.calls().await[0].args, vec!["view", r"\\nas"]);
    }

    #[tokio::test]
    async fn mount_with_credentials() {
        let runner = Arc::new(MockRunner::new());
        runner.push_output("net", ok("The command completed successfully.")).await;
        let windows = platform(runner.clone());

        let outcome = windows
            .mount(&request(Some(CredentialRecord::new("alice", "S3cret!"))))
            .await
            .unwrap();
        assert_eq!(outcome.location, "Z:");
        assert_eq!(outcome.target, r"\\nas\media");

        let calls = runner.calls().await;
        assert_eq!(
            calls[0].args,
            vec!["use", "Z:", r"\\nas\media", "/user:alice", "S3cret!"]
        );
        assert_eq!(calls[0].timeout, PlatformSettings::default().mount_timeout);
    }

    #[tokio::test]
    #[traced_test]
    async fn password_is_masked_in_logs() {
        let runner = Arc::new(MockRunner::new());
        runner.push_output("net", ok("")).await;
        platform(runner)
            .mount(&request(Some(CredentialRecord::new("alice", "S3cret!"))))
            .await
            .unwrap();

        assert!(logs_contain("/user:alice ****"));
        assert!(!logs_contain("S3cret!"));
    }

    #[tokio::test]
    async fn anonymous_mount_skips_user_flag() {
        let runner = Arc::new(MockRunner::new());
        runner.push_output("net", ok("")).await;
        let windows = platform(runner.clone()).with_drive_probe(|c| c == 'Z');

        let outcome = windows.mount(&request(None)).await.unwrap();
        assert_eq!(outcome.location, "Y:");
        assert_eq!(runner.calls().await[0].args, vec!["use", "Y:", r"\\nas\media"]);
    }

    #[tokio::test]
    async fn mount_failure_reports_net_error() {
        let runner = Arc::new(MockRunner::new());
        runner
            .push_output("net", failed(2, "System error 1326 has occurred."))
            .await;
        let err = platform(runner).mount(&request(None)).await.unwrap_err();
        assert!(matches!(err, SmbError::Mount(msg) if msg.contains("1326")));
    }

    #[tokio::test]
    async fn no_free_letter_runs_nothing() {
        let runner = Arc::new(MockRunner::new());
        let windows = platform(runner.clone()).with_drive_probe(|_| true);
        let err = windows.mount(&request(None)).await.unwrap_err();
        assert!(matches!(err, SmbError::Mount(msg) if msg.contains("drive letters")));
        assert_eq!(runner.call_count().await, 0);
    }
}
