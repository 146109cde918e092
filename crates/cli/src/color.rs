// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;
use tidy_core::{ExecutionStatus, Severity};

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;
    pub const ERROR: u8 = 167;
    pub const WARNING: u8 = 179;
    pub const OK: u8 = 108;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("\x1b[38;5;{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

pub fn severity(severity: Severity, text: &str) -> String {
    match severity {
        Severity::Error => paint(codes::ERROR, text),
        Severity::Warning => paint(codes::WARNING, text),
        Severity::Info | Severity::Hint => paint(codes::CONTEXT, text),
    }
}

pub fn status(status: ExecutionStatus, text: &str) -> String {
    match status {
        ExecutionStatus::Success => paint(codes::OK, text),
        ExecutionStatus::Failure | ExecutionStatus::TimedOut => paint(codes::ERROR, text),
        ExecutionStatus::Skipped => paint(codes::MUTED, text),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
