// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! smbcheck: SMB diagnostics, share mapping and credential tokens.
//!
//! The binary in `main.rs` is a thin clap front end over these modules.

pub mod console;
pub mod doctor;
pub mod exit;
pub mod shutdown;
pub mod ui;
pub mod vault_cmd;
pub mod workflow;

pub use workflow::{MapArgs, ProbeReport, Workflow, WorkflowOutcome, WorkflowSettings};

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `log_level`; other crates only log warnings. ANSI
/// colour follows the `ansi` flag.
pub fn init_tracing(log_level: &str, ansi: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("smbcheck={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
