// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived credentials file for `mount -t cifs -o credentials=`.
//!
//! The file is owner-only and is removed when the guard drops, whether the
//! mount succeeded, failed, returned an error early, or the enclosing future
//! was cancelled.

use std::io::Write;
use std::path::Path;

use smbcheck_core::{CredentialRecord, SmbError};
use tempfile::NamedTempFile;
use tracing::debug;
use zeroize::Zeroizing;

/// A private temp file holding `username=` / `password=` lines.
#[derive(Debug)]
pub struct CredentialsFile {
    file: NamedTempFile,
}

impl CredentialsFile {
    /// Write `record` to a fresh `.cred` file readable only by this user.
    pub fn create(record: &CredentialRecord) -> Result<Self, SmbError> {
        for (field, value) in [("username", &record.username), ("password", &record.password)] {
            if value.contains(['\n', '\r']) {
                return Err(SmbError::Input(format!("{field} must not contain line breaks")));
            }
        }

        let mut file = tempfile::Builder::new()
            .prefix("smbcheck-")
            .suffix(".cred")
            .tempfile()?;
        restrict_permissions(file.path())?;

        let contents = Zeroizing::new(format!(
            "username={}\npassword={}\n",
            record.username, record.password
        ));
        file.write_all(contents.as_bytes())?;
        file.flush()?;

        debug!(path = %file.path().display(), "credentials file written");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for CredentialsFile {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "removing credentials file");
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
