// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output formatting with colors and styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};
use rondo_rt::Outcome;

/// Initialize color support based on environment.
/// Call once at startup.
pub fn init() {
    // colored crate handles NO_COLOR automatically,
    // but we add explicit FORCE_COLOR support
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

// === Error Output ===

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn warning_label() -> ColoredString {
    "warning".yellow().bold()
}

// === Run Output ===

pub fn banner_ok(phase: &str, detail: &str) -> String {
    format!(
        "{} {} {}",
        "===".dimmed(),
        format!("{} OK: {}", phase, detail).green().bold(),
        "===".dimmed()
    )
}

pub fn banner_fail(phase: &str, count: usize) -> String {
    let msg = if count == 1 {
        format!("{} FAILED: 1 task", phase)
    } else {
        format!("{} FAILED: {} tasks", phase, count)
    };
    format!("{} {} {}", "===".dimmed(), msg.red().bold(), "===".dimmed())
}

pub fn task_name(name: &str) -> ColoredString {
    name.cyan().bold()
}

pub fn outcome(o: Outcome) -> ColoredString {
    match o {
        Outcome::Suspended => "suspended".dimmed(),
        Outcome::Completed => "completed".green(),
        Outcome::Failed => "failed".red(),
    }
}

pub fn quoted(msg: &str) -> ColoredString {
    format!("{:?}", msg).yellow()
}

// === Help Output ===

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn version(v: &str) -> ColoredString {
    v.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

// === Decorations ===

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}
