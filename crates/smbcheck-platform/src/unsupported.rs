// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback backend for operating systems without SMB support here.

use std::path::PathBuf;

use async_trait::async_trait;
use smbcheck_core::{
    CapabilityProbe, MountOutcome, MountRequest, Platform, PlatformKind, ServiceStatus,
    ShareListing, SmbError,
};

/// Offers no probes and refuses every operation without running anything.
pub struct UnsupportedPlatform {
    os: String,
}

impl UnsupportedPlatform {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    fn missing(&self) -> SmbError {
        SmbError::CapabilityMissing(format!("unsupported operating system: {}", self.os))
    }
}

#[async_trait]
impl Platform for UnsupportedPlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Unsupported(self.os.clone())
    }

    fn capability_probes(&self) -> Vec<CapabilityProbe> {
        Vec::new()
    }

    async fn query_service_status(&self, _name: &str) -> ServiceStatus {
        ServiceStatus::Error(self.missing().to_string())
    }

    async fn list_smb_features(&self) -> Result<String, SmbError> {
        Err(self.missing())
    }

    async fn tool_present(&self, _name: &str) -> bool {
        false
    }

    async fn list_remote_shares(&self, _server: &str) -> Result<ShareListing, SmbError> {
        Err(self.missing())
    }

    async fn mount(&self, _request: &MountRequest) -> Result<MountOutcome, SmbError> {
        Err(self.missing())
    }

    fn default_mount_point(&self, _share: &str) -> Option<PathBuf> {
        None
    }
}
