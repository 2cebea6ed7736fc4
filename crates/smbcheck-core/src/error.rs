// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for smbcheck.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the platform, vault, and workflow layers.
///
/// Lower layers return these as typed results; the workflow decides whether a
/// given failure is a warning or terminal for the run.
#[derive(Debug, Error)]
pub enum SmbError {
    /// A required OS feature, service, or tool is absent (or the OS is unsupported).
    #[error("SMB capability missing: {0}")]
    CapabilityMissing(String),

    /// The target host did not accept a TCP connection on the SMB port.
    #[error("cannot reach {host}:{port}: {reason}")]
    Reachability {
        host: String,
        port: u16,
        reason: String,
    },

    /// Remote share enumeration failed.
    #[error("share listing failed: {0}")]
    Listing(String),

    /// The platform mount command reported failure.
    #[error("mount failed: {0}")]
    Mount(String),

    /// Credential encryption failed. Carries no detail on purpose.
    #[error("failed to encrypt credentials")]
    Encryption,

    /// Credential decryption failed: wrong passphrase, corrupted or malformed
    /// token, or an unreadable payload. All causes share this one message.
    #[error("failed to decrypt credentials: invalid passphrase or corrupted token")]
    Decryption,

    /// An external program could not be started or waited on.
    #[error("could not run `{program}`: {reason}")]
    Command { program: String, reason: String },

    /// A bounded operation ran past its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Configuration errors (invalid values, unreadable file).
    #[error("configuration error: {0}")]
    Config(String),

    /// Console input could not be read or was invalid.
    #[error("input error: {0}")]
    Input(String),

    /// The operator interrupted the run.
    #[error("operation cancelled by user")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("unexpected error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for SmbError {
    fn from(err: std::io::Error) -> Self {
        SmbError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_message_does_not_reveal_cause() {
        let msg = SmbError::Decryption.to_string();
        assert!(msg.contains("invalid passphrase or corrupted token"));
        assert!(!msg.contains("hmac"));
        assert!(!msg.contains("padding"));
    }

    #[test]
    fn reachability_message_names_endpoint() {
        let err = SmbError::Reachability {
            host: "fileserver".into(),
            port: 445,
            reason: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot reach fileserver:445: connection refused"
        );
    }

    #[test]
    fn io_errors_become_internal() {
        let err: SmbError = std::io::Error::other("disk on fire").into();
        assert!(matches!(err, SmbError::Internal(m) if m.contains("disk on fire")));
    }
}
