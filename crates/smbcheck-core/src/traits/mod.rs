// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits injected into the workflow.
//!
//! All traits use `#[async_trait]` so implementations can be held as trait
//! objects and swapped for test doubles.

pub mod input;
pub mod platform;
pub mod runner;

pub use input::InputProvider;
pub use platform::Platform;
pub use runner::CommandRunner;
