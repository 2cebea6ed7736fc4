// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock platform for workflow tests.
//!
//! `MockPlatform` implements `Platform` with canned answers and captures the
//! mount requests it receives.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use smbcheck_core::{
    CapabilityProbe, MountOutcome, MountRequest, Platform, PlatformKind, ServiceStatus,
    ShareListing, SmbError,
};

/// A platform whose every answer is configured up front.
///
/// Unconfigured services report `NotFound`, unconfigured tools are absent,
/// listing and mounting fail until a result is set.
pub struct MockPlatform {
    kind: PlatformKind,
    probes: Vec<CapabilityProbe>,
    services: HashMap<String, ServiceStatus>,
    tools: HashSet<String>,
    features: Result<String, String>,
    listing: Result<ShareListing, String>,
    mount_result: Result<MountOutcome, String>,
    mount_root: Option<PathBuf>,
    mounts: Arc<Mutex<Vec<MountRequest>>>,
}

impl MockPlatform {
    /// Create a platform of `kind` with no probes.
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            kind,
            probes: Vec::new(),
            services: HashMap::new(),
            tools: HashSet::new(),
            features: Err("feature report not configured".to_string()),
            listing: Err("listing not configured".to_string()),
            mount_result: Err("mount not configured".to_string()),
            mount_root: None,
            mounts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A Linux-like platform with `smbclient` installed and a mount that
    /// succeeds under `/mnt`.
    pub fn ready_linux() -> Self {
        Self::new(PlatformKind::Linux)
            .with_probe(CapabilityProbe::Tool {
                name: "smbclient".to_string(),
                hint: None,
            })
            .with_tool("smbclient")
            .with_mount_root("/mnt")
            .with_mount_result(Ok(MountOutcome {
                target: "//server/share".to_string(),
                location: "/mnt/share".to_string(),
            }))
    }

    pub fn with_probe(mut self, probe: CapabilityProbe) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn with_service(mut self, name: &str, status: ServiceStatus) -> Self {
        self.services.insert(name.to_string(), status);
        self
    }

    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools.insert(name.to_string());
        self
    }

    pub fn with_features(mut self, report: Result<String, String>) -> Self {
        self.features = report;
        self
    }

    pub fn with_listing(mut self, listing: Result<ShareListing, String>) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_mount_result(mut self, result: Result<MountOutcome, String>) -> Self {
        self.mount_result = result;
        self
    }

    /// Directory under which default mount points are placed. Without one
    /// the platform behaves like Windows (no mount point).
    pub fn with_mount_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.mount_root = Some(root.into());
        self
    }

    /// Every mount request received so far.
    pub async fn mount_requests(&self) -> Vec<MountRequest> {
        self.mounts.lock().await.clone()
    }
}

#[async_trait]
impl Platform for MockPlatform {
    fn kind(&self) -> PlatformKind {
        self.kind.clone()
    }

    fn capability_probes(&self) -> Vec<CapabilityProbe> {
        self.probes.clone()
    }

    async fn query_service_status(&self, name: &str) -> ServiceStatus {
        self.services
            .get(name)
            .cloned()
            .unwrap_or(ServiceStatus::NotFound)
    }

    async fn list_smb_features(&self) -> Result<String, SmbError> {
        self.features.clone().map_err(|reason| SmbError::Command {
            program: "powershell".to_string(),
            reason,
        })
    }

    async fn tool_present(&self, name: &str) -> bool {
        self.tools.contains(name)
    }

    async fn list_remote_shares(&self, _server: &str) -> Result<ShareListing, SmbError> {
        self.listing.clone().map_err(SmbError::Listing)
    }

    async fn mount(&self, request: &MountRequest) -> Result<MountOutcome, SmbError> {
        self.mounts.lock().await.push(request.clone());
        self.mount_result.clone().map_err(SmbError::Mount)
    }

    fn default_mount_point(&self, share: &str) -> Option<PathBuf> {
        self.mount_root.as_ref().map(|root| root.join(share))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_answers_are_failures() {
        let platform = MockPlatform::new(PlatformKind::Windows);
        assert_eq!(
            platform.query_service_status("LanmanServer").await,
            ServiceStatus::NotFound
        );
        assert!(!platform.tool_present("smbutil").await);
        assert!(platform.list_remote_shares("nas").await.is_err());
        assert!(platform.default_mount_point("docs").is_none());
    }

    #[tokio::test]
    async fn records_mount_requests() {
        let platform = MockPlatform::ready_linux();
        let request = MountRequest {
            server: "nas".to_string(),
            share: "docs".to_string(),
            credentials: None,
            mount_point: None,
        };
        let outcome = platform.mount(&request).await.unwrap();
        assert_eq!(outcome.location, "/mnt/share");

        let seen = platform.mount_requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].share, "docs");
        assert_eq!(
            platform.default_mount_point("docs"),
            Some(PathBuf::from("/mnt/docs"))
        );
    }
}
