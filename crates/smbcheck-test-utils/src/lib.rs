// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for smbcheck.
//!
//! Deterministic stand-ins for the three injected ports, so workflow and
//! platform tests never spawn a process or read a terminal.
//!
//! # Components
//!
//! - [`MockRunner`] - `CommandRunner` with scripted outputs and recorded calls
//! - [`MockPlatform`] - `Platform` with canned statuses, listings and mount results
//! - [`ScriptedInput`] - `InputProvider` answering prompts from a queue

pub mod mock_platform;
pub mod mock_runner;
pub mod scripted_input;

pub use mock_platform::MockPlatform;
pub use mock_runner::{MockRunner, RecordedCall, failed, ok};
pub use scripted_input::{Answer, RecordedPrompt, ScriptedInput};
