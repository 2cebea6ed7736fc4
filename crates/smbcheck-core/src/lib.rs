// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for smbcheck.
//!
//! This crate provides the error taxonomy, the shared data model, and the
//! collaborator traits used throughout the smbcheck workspace. Platform
//! backends, the console, and test doubles all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SmbError;
pub use types::{
    CapabilityProbe, CommandOutput, CredentialRecord, HostInfo, MountOutcome, MountRequest,
    PlatformKind, ServiceStatus, ShareListing, WorkflowStage,
};

pub use traits::{CommandRunner, InputProvider, Platform};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smb_error_has_all_variants() {
        let _capability = SmbError::CapabilityMissing("smbclient".into());
        let _reach = SmbError::Reachability {
            host: "nas".into(),
            port: 445,
            reason: "refused".into(),
        };
        let _listing = SmbError::Listing("denied".into());
        let _mount = SmbError::Mount("bad share".into());
        let _enc = SmbError::Encryption;
        let _dec = SmbError::Decryption;
        let _cmd = SmbError::Command {
            program: "net".into(),
            reason: "not found".into(),
        };
        let _timeout = SmbError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _config = SmbError::Config("test".into());
        let _input = SmbError::Input("eof".into());
        let _cancelled = SmbError::Cancelled;
        let _internal = SmbError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_platform<T: Platform>() {}
        fn _assert_runner<T: CommandRunner>() {}
        fn _assert_input<T: InputProvider>() {}
    }
}
