// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-facing output: status lines, section headers and the banner.
//!
//! With colour, lines are marked `✓` / `!` / `✗`; in plain mode the markers
//! are `[OK]` / `[WARN]` / `[FAIL]` so the output stays greppable.

use colored::Colorize;
use smbcheck_core::HostInfo;

const RULE_WIDTH: usize = 60;

/// Severity of one printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Fail,
}

/// Output style for one run.
#[derive(Debug, Clone, Copy)]
pub struct Ui {
    color: bool,
}

impl Ui {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Marker for `level`, coloured when enabled.
    pub fn marker(&self, level: Level) -> String {
        match (level, self.color) {
            (Level::Ok, true) => "✓".green().to_string(),
            (Level::Warn, true) => "!".yellow().to_string(),
            (Level::Fail, true) => "✗".red().to_string(),
            (Level::Ok, false) => "[OK]".to_string(),
            (Level::Warn, false) => "[WARN]".to_string(),
            (Level::Fail, false) => "[FAIL]".to_string(),
        }
    }

    pub fn line(&self, level: Level, message: &str) -> String {
        let message = match (level, self.color) {
            (Level::Warn, true) => message.yellow().to_string(),
            (Level::Fail, true) => message.red().to_string(),
            _ => message.to_string(),
        };
        format!("{} {message}", self.marker(level))
    }

    pub fn ok(&self, message: &str) {
        println!("{}", self.line(Level::Ok, message));
    }

    pub fn warn(&self, message: &str) {
        println!("{}", self.line(Level::Warn, message));
    }

    pub fn fail(&self, message: &str) {
        println!("{}", self.line(Level::Fail, message));
    }

    /// Indented continuation line under a status line.
    pub fn detail(&self, message: &str) {
        for line in message.lines() {
            println!("   {line}");
        }
    }

    pub fn section(&self, title: &str) {
        println!();
        println!("{}", rule());
        let title = format!("{title:^width$}", width = RULE_WIDTH);
        if self.color {
            println!("{}", title.trim_end().bold());
        } else {
            println!("{}", title.trim_end());
        }
        println!("{}", rule());
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Startup banner with host details.
pub fn banner(host: &HostInfo) -> String {
    let rule = rule();
    let title = format!("{:^width$}", "SMB DIAGNOSTIC TOOL", width = RULE_WIDTH);
    format!(
        "{rule}\n{}\n{rule}\nOperating System: {} {}\nArchitecture: {}\nsmbcheck version: {}\n{rule}\n",
        title.trim_end(),
        host.os_name,
        host.os_version,
        host.arch,
        env!("CARGO_PKG_VERSION"),
    )
}
