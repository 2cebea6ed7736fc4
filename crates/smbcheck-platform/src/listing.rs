// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Share listing output handling shared by the backends.

use smbcheck_core::{CommandOutput, ShareListing, SmbError};

/// Trimmed, non-empty lines of `text` containing any of `markers`.
///
/// An empty `markers` slice keeps nothing.
pub fn share_lines(text: &str, markers: &[&str]) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| markers.iter().any(|m| line.contains(m)))
        .map(str::to_string)
        .collect()
}

/// Turn the result of a listing command into a [`ShareListing`].
///
/// A failed run becomes [`SmbError::Listing`] carrying the command's own
/// diagnostic; a spawn failure or timeout is folded in the same way.
pub fn listing_from(
    result: Result<CommandOutput, SmbError>,
    markers: &[&str],
) -> Result<ShareListing, SmbError> {
    let output = result.map_err(|e| SmbError::Listing(e.to_string()))?;
    if !output.success() {
        return Err(SmbError::Listing(output.diagnostic()));
    }
    let shares = share_lines(&output.stdout, markers);
    Ok(ShareListing {
        raw: output.stdout,
        shares,
    })
}
