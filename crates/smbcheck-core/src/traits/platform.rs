// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The platform collaborator: OS-specific service queries, share listing, and
//! mounting.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::SmbError;
use crate::types::{
    CapabilityProbe, MountOutcome, MountRequest, PlatformKind, ServiceStatus, ShareListing,
};

/// OS-specific SMB operations.
///
/// One implementation per supported OS plus an unsupported fallback. The
/// implementation is chosen once at startup and passed to the workflow.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Which OS family this backend drives.
    fn kind(&self) -> PlatformKind;

    /// The checks that decide whether this host can do SMB at all.
    ///
    /// An empty list means the platform cannot be used.
    fn capability_probes(&self) -> Vec<CapabilityProbe>;

    /// Query a named platform service.
    async fn query_service_status(&self, name: &str) -> ServiceStatus;

    /// Best-effort report of optional SMB features. May need elevation.
    async fn list_smb_features(&self) -> Result<String, SmbError>;

    /// Whether an SMB-related executable is available.
    async fn tool_present(&self, name: &str) -> bool;

    /// Enumerate the shares offered by `server`.
    async fn list_remote_shares(&self, server: &str) -> Result<ShareListing, SmbError>;

    /// Mount `request.share` from `request.server`.
    async fn mount(&self, request: &MountRequest) -> Result<MountOutcome, SmbError>;

    /// Mount point used when the operator gives none. `None` when the
    /// platform does not mount onto a directory (drive letters).
    fn default_mount_point(&self, share: &str) -> Option<PathBuf>;
}
