// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability check: can this host do SMB at all?
//!
//! Runs the vault self-test and every probe the platform asks for, then
//! decides readiness: at least one required service running or one client
//! tool present. Feature reports and optional services only ever warn.

use std::time::{Duration, Instant};

use smbcheck_core::{CapabilityProbe, Platform, ServiceStatus};
use tracing::{info, warn};

use crate::ui::{Level, Ui};

/// Status of a diagnostic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    /// Remediation shown under a failed or warning line.
    pub hint: Option<String>,
    pub duration: Duration,
}

/// Everything the capability check found.
#[derive(Debug, Clone)]
pub struct CapabilityReport {
    pub results: Vec<CheckResult>,
    /// Output of the optional feature query, shown after the table.
    pub feature_report: Option<String>,
    pub ready: bool,
    /// Why the host is not ready, if it is not.
    pub reason: Option<String>,
}

impl CapabilityReport {
    pub fn issue_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status != CheckStatus::Pass)
            .count()
    }
}

/// Run the capability check against `platform`.
///
/// An unsupported platform has no probes; the check then fails straight
/// away without running any command.
pub async fn run_capability_check(platform: &dyn Platform) -> CapabilityReport {
    let mut results = vec![check_vault()];
    let vault_ok = results[0].status == CheckStatus::Pass;

    let probes = platform.capability_probes();
    if probes.is_empty() {
        let reason = format!("SMB is not supported on {}", platform.kind());
        warn!(%reason, "capability check failed");
        results.push(CheckResult {
            name: "Platform".to_string(),
            status: CheckStatus::Fail,
            message: reason.clone(),
            hint: None,
            duration: Duration::ZERO,
        });
        return CapabilityReport {
            results,
            feature_report: None,
            ready: false,
            reason: Some(reason),
        };
    }

    let mut satisfied = false;
    let mut feature_report = None;
    for probe in probes {
        let start = Instant::now();
        let result = match probe {
            CapabilityProbe::Service {
                name,
                required,
                hint,
            } => {
                let status = platform.query_service_status(&name).await;
                let running = status == ServiceStatus::Running;
                satisfied |= required && running;
                CheckResult {
                    status: match (running, required) {
                        (true, _) => CheckStatus::Pass,
                        (false, true) => CheckStatus::Fail,
                        (false, false) => CheckStatus::Warn,
                    },
                    message: match (&status, required) {
                        (ServiceStatus::NotFound, false) => "status unknown".to_string(),
                        _ => status.to_string(),
                    },
                    hint: if running { None } else { hint },
                    name,
                    duration: start.elapsed(),
                }
            }
            CapabilityProbe::Tool { name, hint } => {
                let present = platform.tool_present(&name).await;
                satisfied |= present;
                CheckResult {
                    status: if present {
                        CheckStatus::Pass
                    } else {
                        CheckStatus::Fail
                    },
                    message: if present { "available" } else { "not found" }.to_string(),
                    hint: if present { None } else { hint },
                    name,
                    duration: start.elapsed(),
                }
            }
            CapabilityProbe::FeatureReport => match platform.list_smb_features().await {
                Ok(report) => {
                    feature_report = Some(report);
                    CheckResult {
                        name: "SMB features".to_string(),
                        status: CheckStatus::Pass,
                        message: "listed below".to_string(),
                        hint: None,
                        duration: start.elapsed(),
                    }
                }
                Err(e) => CheckResult {
                    name: "SMB features".to_string(),
                    status: CheckStatus::Warn,
                    message: e.to_string(),
                    hint: None,
                    duration: start.elapsed(),
                },
            },
        };
        results.push(result);
    }

    let ready = vault_ok && satisfied;
    let reason = if !vault_ok {
        Some("credential encryption is not working on this host".to_string())
    } else if !satisfied {
        Some("SMB services/tools not properly configured".to_string())
    } else {
        None
    };
    let report = CapabilityReport {
        results,
        feature_report,
        ready,
        reason,
    };
    info!(ready, issues = report.issue_count(), "capability check finished");
    report
}

/// Seal and open a throwaway record to prove the cipher stack works.
fn check_vault() -> CheckResult {
    let start = Instant::now();
    let (status, message) = match smbcheck_vault::fernet::self_test() {
        Ok(()) => (CheckStatus::Pass, "available".to_string()),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Credential vault".to_string(),
        status,
        message,
        hint: None,
        duration: start.elapsed(),
    }
}

/// Render the report as the table printed by `diagnose`.
pub fn format_report(report: &CapabilityReport, ui: &Ui) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("  smbcheck diagnose\n");
    out.push_str(&format!("  {}\n", "-".repeat(50)));

    for result in &report.results {
        let level = match result.status {
            CheckStatus::Pass => Level::Ok,
            CheckStatus::Warn => Level::Warn,
            CheckStatus::Fail => Level::Fail,
        };
        let marker = if ui.color() {
            ui.marker(level)
        } else {
            format!("{:<6}", ui.marker(level))
        };
        out.push_str(&format!(
            "    {marker} {:<26} {} ({}ms)\n",
            result.name,
            result.message,
            result.duration.as_millis()
        ));
        if let Some(hint) = &result.hint {
            for line in hint.lines() {
                out.push_str(&format!("           {line}\n"));
            }
        }
    }

    if let Some(features) = report.feature_report.as_deref().map(str::trim) {
        if !features.is_empty() {
            out.push_str("\n  SMB features status:\n");
            for line in features.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }

    out.push('\n');
    let issues = report.issue_count();
    match (&report.reason, issues) {
        (Some(reason), _) => out.push_str(&format!("  Not ready: {reason}.\n")),
        (None, 0) => out.push_str("  All checks passed.\n"),
        (None, n) => {
            let word = if n == 1 { "issue" } else { "issues" };
            out.push_str(&format!("  Ready, with {n} {word}.\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use smbcheck_core::PlatformKind;
    use smbcheck_test_utils::MockPlatform;

    fn service(name: &str, required: bool) -> CapabilityProbe {
        CapabilityProbe::Service {
            name: name.to_string(),
            required,
            hint: Some(format!("To start: sc start {name}")),
        }
    }

    fn windows(server: ServiceStatus, workstation: ServiceStatus) -> MockPlatform {
        MockPlatform::new(PlatformKind::Windows)
            .with_probe(service("LanmanServer", true))
            .with_probe(service("LanmanWorkstation", true))
            .with_probe(CapabilityProbe::FeatureReport)
            .with_service("LanmanServer", server)
            .with_service("LanmanWorkstation", workstation)
    }

    #[test]
    fn check_status_equality() {
        assert_eq!(CheckStatus::Pass, CheckStatus::Pass);
        assert_ne!(CheckStatus::Pass, CheckStatus::Fail);
    }

    #[test]
    fn vault_self_test_passes() {
        assert_eq!(check_vault().status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn one_running_service_is_enough() {
        let platform = windows(ServiceStatus::Stopped, ServiceStatus::Running);
        let report = run_capability_check(&platform).await;
        assert!(report.ready);

        let server = &report.results[1];
        assert_eq!(server.status, CheckStatus::Fail);
        assert_eq!(server.message, "Stopped");
        assert_eq!(server.hint.as_deref(), Some("To start: sc start LanmanServer"));
        assert!(report.results[2].hint.is_none());
    }

    #[tokio::test]
    async fn no_running_service_fails() {
        let platform = windows(ServiceStatus::NotFound, ServiceStatus::Error("boom".into()));
        let report = run_capability_check(&platform).await;
        assert!(!report.ready);
        assert_eq!(report.results[1].message, "Not found");
        assert_eq!(report.results[2].message, "Error: boom");
    }

    #[tokio::test]
    async fn feature_report_failure_only_warns() {
        let platform = windows(ServiceStatus::Running, ServiceStatus::Running)
            .with_features(Err("requires admin privileges".to_string()));
        let report = run_capability_check(&platform).await;
        assert!(report.ready);
        assert_eq!(report.results[3].status, CheckStatus::Warn);
        assert_eq!(report.issue_count(), 1);
    }

    #[tokio::test]
    async fn any_tool_is_enough() {
        let platform = MockPlatform::new(PlatformKind::Linux)
            .with_probe(CapabilityProbe::Tool { name: "smbclient".into(), hint: Some("install".into()) })
            .with_probe(CapabilityProbe::Tool { name: "mount.cifs".into(), hint: Some("install".into()) })
            .with_tool("mount.cifs");
        let report = run_capability_check(&platform).await;
        assert!(report.ready);
        assert_eq!(report.results[1].hint.as_deref(), Some("install"));
        assert!(report.results[2].hint.is_none());
    }

    #[tokio::test]
    async fn optional_service_never_blocks() {
        let platform = MockPlatform::new(PlatformKind::MacOs)
            .with_probe(CapabilityProbe::Tool { name: "smbutil".into(), hint: None })
            .with_probe(CapabilityProbe::Service {
                name: "com.apple.smb.preferences".into(),
                required: false,
                hint: None,
            })
            .with_tool("smbutil");
        let report = run_capability_check(&platform).await;
        assert!(report.ready);
        assert_eq!(report.results[2].status, CheckStatus::Warn);
        assert_eq!(report.results[2].message, "status unknown");
    }

    #[tokio::test]
    async fn no_probes_means_unsupported() {
        let platform = MockPlatform::new(PlatformKind::Unsupported("haiku".into()));
        let report = run_capability_check(&platform).await;
        assert!(!report.ready);
        assert!(report.reason.as_deref().unwrap().contains("haiku"));
    }

    #[tokio::test]
    async fn plain_report_layout() {
        let platform = windows(ServiceStatus::Running, ServiceStatus::Stopped)
            .with_features(Ok("FeatureName : SMB1Protocol\nState       : Disabled\n".into()));
        let report = run_capability_check(&platform).await;
        let text = format_report(&report, &Ui::new(false));

        assert!(text.contains("[OK]   Credential vault"));
        assert!(text.contains("[FAIL] LanmanWorkstation"));
        assert!(text.contains("To start: sc start LanmanWorkstation"));
        assert!(text.contains("SMB features status:"));
        assert!(text.contains("SMB1Protocol"));
        assert!(text.contains("Ready, with 1 issue."));
    }
}
