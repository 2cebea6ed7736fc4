// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process exit codes.

use smbcheck_core::SmbError;

use crate::workflow::WorkflowOutcome;

pub const SUCCESS: i32 = 0;
/// Unexpected error, bad configuration or unusable input.
pub const FAILURE: i32 = 1;
pub const DIAGNOSTICS_FAILED: i32 = 2;
pub const UNREACHABLE_OR_MOUNT: i32 = 3;
/// A credential token could not be issued or opened.
pub const VAULT: i32 = 4;
/// 128 + SIGINT.
pub const CANCELLED: i32 = 130;

/// Exit code for a finished run.
pub fn exit_code(outcome: &WorkflowOutcome) -> i32 {
    match outcome {
        WorkflowOutcome::MountSucceeded(_) | WorkflowOutcome::Declined => SUCCESS,
        WorkflowOutcome::DiagnosticsFailed => DIAGNOSTICS_FAILED,
        WorkflowOutcome::Unreachable(_) | WorkflowOutcome::MountFailed(_) => UNREACHABLE_OR_MOUNT,
    }
}

/// Exit code for a run that ended with an error.
pub fn exit_code_for_error(err: &SmbError) -> i32 {
    match err {
        SmbError::Cancelled => CANCELLED,
        SmbError::CapabilityMissing(_) => DIAGNOSTICS_FAILED,
        SmbError::Reachability { .. } | SmbError::Mount(_) => UNREACHABLE_OR_MOUNT,
        SmbError::Encryption | SmbError::Decryption => VAULT,
        SmbError::Listing(_)
        | SmbError::Command { .. }
        | SmbError::Timeout { .. }
        | SmbError::Config(_)
        | SmbError::Input(_)
        | SmbError::Internal(_) => FAILURE,
    }
}
