//! Terminal output: colored notes and a reply sink that prints to stdout.

use async_trait::async_trait;
use telefax_config::ValidationReport;
use telefax_core::{ReplySink, SenderId};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn note(color: &str, symbol: &str, plain: &str, msg: &str) -> String {
    if supports_color() {
        format!("{color}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{plain}: {msg}")
    }
}

pub fn note_info(msg: &str) {
    println!("{}", note(CYAN, "ℹ", "INFO", msg));
}

pub fn note_warn(msg: &str) {
    println!("{}", note(YELLOW, "⚠", "WARN", msg));
}

pub fn note_error(msg: &str) {
    eprintln!("{}", note(RED, "✗", "ERROR", msg));
}

pub fn note_success(msg: &str) {
    println!("{}", note(GREEN, "✓", "OK", msg));
}

/// Print every warning and error in the report.
pub fn print_report(report: &ValidationReport) {
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if report.warnings.is_empty() && report.errors.is_empty() {
        note_success("Configuration is valid");
    }
}

/// Replies for the local operator go to the terminal.
pub struct StdoutReplySink;

#[async_trait]
impl ReplySink for StdoutReplySink {
    async fn send_reply(&self, _sender: &SenderId, text: &str) -> anyhow::Result<()> {
        note_info(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_ends_with_message() {
        let text = note(GREEN, "✓", "OK", "done");
        assert!(text.ends_with("done"));
    }

    #[tokio::test]
    async fn stdout_sink_never_fails() {
        assert!(StdoutReplySink.send_reply(&SenderId::from("local"), "hi").await.is_ok());
    }
}
