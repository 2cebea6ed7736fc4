// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The diagnose-then-mount flow.
//!
//! Stages run strictly in order: capability check, reachability, share
//! listing, credential acquisition, mount. Each either continues or ends the
//! run with a [`WorkflowOutcome`]. There are no retries.
//!
//! Share listing failures only warn. An unreachable server ends the mapping
//! flow, but is only a warning for `probe`. Operator interrupts and console
//! failures come back as `Err`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use smbcheck_config::SmbCheckConfig;
use smbcheck_core::{
    CredentialRecord, InputProvider, MountOutcome, MountRequest, Platform, PlatformKind,
    ShareListing, SmbError, WorkflowStage,
};
use smbcheck_platform::check_reachable;
use smbcheck_vault::{CredentialVault, token_preview};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::doctor::{self, CapabilityReport};
use crate::ui::Ui;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The host cannot do SMB; nothing was attempted.
    DiagnosticsFailed,
    /// Diagnostics passed and the operator chose not to map a share.
    Declined,
    /// The server did not accept a connection on the SMB port.
    Unreachable(String),
    MountSucceeded(MountOutcome),
    MountFailed(String),
}

/// Values given on the command line; anything missing is prompted for.
#[derive(Debug, Clone, Default)]
pub struct MapArgs {
    pub server: Option<String>,
    pub share: Option<String>,
    pub mount_point: Option<PathBuf>,
    /// A token from `vault encrypt`, used instead of username/password.
    pub token: Option<String>,
}

/// Network and display settings for a run.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub smb_port: u16,
    pub connect_timeout: Duration,
    pub preview_len: usize,
}

impl WorkflowSettings {
    pub fn from_config(config: &SmbCheckConfig) -> Self {
        Self {
            smb_port: config.network.smb_port,
            connect_timeout: config.network.connect_timeout(),
            preview_len: config.vault.preview_len,
        }
    }
}

/// Result of the standalone `probe` command.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub reachable: bool,
    pub listing: Option<Result<ShareListing, String>>,
}

/// Drives one run against an injected platform and console.
pub struct Workflow<'a> {
    platform: &'a dyn Platform,
    input: &'a dyn InputProvider,
    vault: CredentialVault,
    settings: WorkflowSettings,
    ui: Ui,
}

impl<'a> Workflow<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        input: &'a dyn InputProvider,
        vault: CredentialVault,
        settings: WorkflowSettings,
        ui: Ui,
    ) -> Self {
        Self {
            platform,
            input,
            vault,
            settings,
            ui,
        }
    }

    /// The default run: capability check, then offer to map a share.
    pub async fn run_interactive(&self) -> Result<WorkflowOutcome, SmbError> {
        println!("Starting SMB diagnostics...");
        let report = self.diagnose().await;
        if !report.ready {
            return Ok(WorkflowOutcome::DiagnosticsFailed);
        }

        let answer = self
            .input
            .read_line("\nWould you like to map an SMB share now? (y/n): ")
            .await?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            info!("operator declined mapping");
            return Ok(WorkflowOutcome::Declined);
        }
        self.map(MapArgs::default()).await
    }

    /// Run and print the capability check.
    pub async fn diagnose(&self) -> CapabilityReport {
        stage(WorkflowStage::CapabilityCheck);
        let report = doctor::run_capability_check(self.platform).await;
        print!("{}", doctor::format_report(&report, &self.ui));
        if let Some(reason) = &report.reason {
            self.ui.fail(reason);
            self.ui
                .detail("Please enable the required SMB services or install the client tools.");
        }
        report
    }

    /// The mapping flow: server and share, reachability, listing,
    /// credentials, mount.
    ///
    /// The full capability check is not repeated here, but a platform with
    /// no SMB support at all ends the run before any prompt.
    pub async fn map(&self, args: MapArgs) -> Result<WorkflowOutcome, SmbError> {
        if self.platform.capability_probes().is_empty() {
            self.ui
                .fail(&format!("SMB is not supported on {}.", self.platform.kind()));
            return Ok(WorkflowOutcome::DiagnosticsFailed);
        }
        self.ui.section("SMB SHARE MAPPING");

        let server = self
            .value_or_prompt(args.server, "\nEnter server IP address or hostname: ", "server address")
            .await?;
        let share = self
            .value_or_prompt(args.share, "Enter share name: ", "share name")
            .await?;

        stage(WorkflowStage::ReachabilityCheck);
        if let Err(reason) = self.reachability(&server).await {
            self.ui
                .fail("Cannot reach server. Please check network connectivity.");
            return Ok(WorkflowOutcome::Unreachable(reason));
        }

        stage(WorkflowStage::ShareListing);
        if self.show_listing(&server).await.is_err() {
            self.ui
                .warn("SMB connection test failed, but attempting to proceed...");
        }

        stage(WorkflowStage::CredentialAcquisition);
        let credentials = match args.token {
            Some(token) => Some(self.credentials_from_token(&token).await?),
            None => self.prompt_credentials().await?,
        };
        let mount_point = match args.mount_point {
            Some(path) => Some(path),
            None => self.prompt_mount_point(&share).await?,
        };

        stage(WorkflowStage::MountInvocation);
        let request = MountRequest {
            server,
            share,
            credentials,
            mount_point,
        };
        let unc = request.unc_path();
        println!("\nAttempting to mount {unc}...");

        match self.platform.mount(&request).await {
            Ok(outcome) => {
                match self.platform.kind() {
                    PlatformKind::Windows => {
                        self.ui
                            .ok(&format!("Successfully mapped {unc} to {}", outcome.location));
                        self.ui.detail(&format!("Access via: {}\\", outcome.location));
                    }
                    _ => self.ui.ok(&format!(
                        "Successfully mounted {} to {}",
                        outcome.target, outcome.location
                    )),
                }
                self.ui
                    .ok(&format!("Successfully configured SMB access to {unc}"));
                Ok(WorkflowOutcome::MountSucceeded(outcome))
            }
            Err(e) => {
                debug!(error = %e, "mount failed");
                self.ui.fail(&e.to_string());
                self.ui
                    .fail(&format!("Failed to configure SMB access to {unc}"));
                Ok(WorkflowOutcome::MountFailed(e.to_string()))
            }
        }
    }

    /// Standalone reachability test plus optional share listing.
    ///
    /// Unreachable is a warning here; the listing is still attempted.
    pub async fn probe(&self, host: &str, list: bool) -> ProbeReport {
        stage(WorkflowStage::ReachabilityCheck);
        let reachable = self.reachability(host).await.is_ok();
        if !reachable {
            self.ui
                .warn("Port closed or unreachable; share listing may fail.");
        }

        let listing = if list {
            stage(WorkflowStage::ShareListing);
            Some(self.show_listing(host).await.map_err(|e| e.to_string()))
        } else {
            None
        };
        ProbeReport { reachable, listing }
    }

    async fn value_or_prompt(
        &self,
        given: Option<String>,
        prompt: &str,
        what: &str,
    ) -> Result<String, SmbError> {
        let value = match given {
            Some(value) => value,
            None => self.input.read_line(prompt).await?,
        };
        let value = value.trim().to_string();
        if value.is_empty() {
            self.ui.fail(&format!("{} is required.", capitalize(what)));
            return Err(SmbError::Input(format!("{what} is required")));
        }
        Ok(value)
    }

    async fn reachability(&self, host: &str) -> Result<(), String> {
        let port = self.settings.smb_port;
        println!("\nTesting network connectivity to {host}:{port}...");
        match check_reachable(host, port, self.settings.connect_timeout).await {
            Ok(()) => {
                self.ui.ok(&format!("Port {port}: Open"));
                Ok(())
            }
            Err(e) => {
                let reason = match &e {
                    SmbError::Reachability { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                debug!(host, port, %reason, "server unreachable");
                self.ui
                    .fail(&format!("Port {port}: Closed or unreachable ({reason})"));
                Err(e.to_string())
            }
        }
    }

    async fn show_listing(&self, server: &str) -> Result<ShareListing, SmbError> {
        println!("\nTesting SMB connection to {server}...");
        match self.platform.list_remote_shares(server).await {
            Ok(listing) => {
                self.ui
                    .ok(&format!("SMB connection to {server}: Success"));
                if !listing.shares.is_empty() {
                    println!("Available shares:");
                    for share in &listing.shares {
                        println!("   {share}");
                    }
                } else if !listing.raw.trim().is_empty() {
                    println!("Available shares:");
                    println!("{}", listing.raw.trim_end());
                }
                Ok(listing)
            }
            Err(e) => {
                debug!(server, error = %e, "share listing failed");
                self.ui
                    .fail(&format!("SMB connection to {server}: Failed"));
                self.ui.detail(&format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ask for username, password and an optional encryption passphrase.
    ///
    /// A blank username means anonymous access. With a passphrase, the
    /// credentials used for the mount are the ones recovered from the
    /// freshly issued token.
    async fn prompt_credentials(&self) -> Result<Option<CredentialRecord>, SmbError> {
        println!("\nEnter credentials (press Enter for anonymous access):");
        let username = self.input.read_line("Username: ").await?.trim().to_string();
        if username.is_empty() {
            info!("anonymous access");
            return Ok(None);
        }

        let password = Zeroizing::new(self.input.read_secret("Password: ").await?);
        let record = CredentialRecord::new(username, password.as_str());

        println!("\nFor security, credentials will be encrypted.");
        let passphrase = self
            .input
            .read_secret("Enter encryption password (blank to skip): ")
            .await?;
        if passphrase.is_empty() {
            self.ui
                .warn("No encryption password given; credentials stay in memory unencrypted.");
            return Ok(Some(record));
        }
        let passphrase = SecretString::from(passphrase);

        let token = self.vault.encrypt(&record, &passphrase).inspect_err(|_| {
            self.ui.fail("Failed to encrypt credentials.");
        })?;
        self.ui.ok("Credentials encrypted successfully.");
        println!(
            "Encrypted data: {}",
            token_preview(&token, self.settings.preview_len)
        );

        let recovered = self.vault.decrypt(&token, &passphrase)?;
        Ok(Some(recovered))
    }

    async fn credentials_from_token(&self, token: &str) -> Result<CredentialRecord, SmbError> {
        let passphrase = SecretString::from(
            self.input
                .read_secret("Enter encryption password: ")
                .await?,
        );
        match self.vault.decrypt(token, &passphrase) {
            Ok(record) => {
                self.ui
                    .ok(&format!("Credentials decrypted for user {}.", record.username));
                Ok(record)
            }
            Err(e) => {
                self.ui.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Only asked where the platform mounts onto a directory.
    async fn prompt_mount_point(&self, share: &str) -> Result<Option<PathBuf>, SmbError> {
        let Some(default) = self.platform.default_mount_point(share) else {
            return Ok(None);
        };
        let answer = self
            .input
            .read_line(&format!(
                "\nEnter mount point (default: {}): ",
                default.display()
            ))
            .await?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| PathBuf::from(answer)))
    }
}

fn stage(stage: WorkflowStage) {
    info!(%stage, "entering stage");
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("server address"), "Server address");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn settings_follow_config() {
        let mut config = SmbCheckConfig::default();
        config.network.smb_port = 4455;
        config.vault.preview_len = 20;
        let settings = WorkflowSettings::from_config(&config);
        assert_eq!(settings.smb_port, 4455);
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.preview_len, 20);
    }
}
