//! Config validation: checks with user-friendly messages.

use crate::schema::TelefaxConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

pub const BOT_TOKEN_PATH: &str = "telegram.botToken";
pub const PRINTER_NAME_PATH: &str = "printer.name";

/// A collection of validation errors found in one pass.
#[derive(Debug, Default, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors other than those at `ignored` paths.
    pub fn errors_except<'a>(&'a self, ignored: &'a [&'a str]) -> impl Iterator<Item = &'a ConfigValidationError> {
        self.errors
            .iter()
            .filter(move |e| !ignored.contains(&e.path.as_str()))
    }

    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = ConfigValidationError>) {
        self.warnings.extend(warnings);
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TelefaxConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_telegram(config, &mut report);
    validate_printer(config, &mut report);
    validate_access(config, &mut report);
    report
}

fn validate_telegram(config: &TelefaxConfig, report: &mut ValidationReport) {
    match config.telegram.bot_token.as_deref().map(str::trim) {
        None | Some("") => report.error(BOT_TOKEN_PATH, "TELEGRAM_BOT_TOKEN is not set"),
        Some(token) if !token.contains(':') => {
            report.warn(BOT_TOKEN_PATH, "does not look like a Telegram bot token")
        }
        Some(_) => {}
    }
}

fn validate_printer(config: &TelefaxConfig, report: &mut ValidationReport) {
    if config.printer.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
        report.error(
            PRINTER_NAME_PATH,
            "CUPS_PRINTER_NAME is not set; print requests will be refused",
        );
    }
}

fn validate_access(config: &TelefaxConfig, report: &mut ValidationReport) {
    let access = &config.access;
    if access.allowed_senders.iter().all(|s| s.trim().is_empty()) {
        report.warn(
            "access.allowedSenders",
            "allow-list is empty; nobody can print",
        );
    }
    if let Some(admins) = &access.admin_senders {
        if admins.is_empty() {
            report.warn("access.adminSenders", "admin list is empty; nobody can change limits");
        }
        for admin in admins {
            if !access.allowed_senders.contains(admin) {
                report.warn(
                    "access.adminSenders",
                    format!("admin `{admin}` is not on the allow-list and is ignored"),
                );
            }
        }
    }
}
