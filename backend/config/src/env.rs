//! Environment variable overlay.
//!
//! Variables win over the config file. Numeric values that do not parse, or
//! are not positive, fall back to the default and produce a warning.

use std::collections::HashMap;
use std::str::FromStr;

use telefax_core::{CopyLimitPolicy, OutputFormat};
use tracing::debug;

use crate::defaults;
use crate::schema::TelefaxConfig;
use crate::validation::ConfigValidationError;

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const CUPS_PRINTER_NAME: &str = "CUPS_PRINTER_NAME";
pub const CUPS_SERVER_HOST: &str = "CUPS_SERVER_HOST";
pub const PRINT_TIMEOUT_SECS: &str = "PRINT_TIMEOUT_SECS";
pub const ALLOWED_USER_IDS: &str = "ALLOWED_USER_IDS";
pub const ADMIN_USER_IDS: &str = "ADMIN_USER_IDS";
pub const MAX_COPIES: &str = "MAX_COPIES";
pub const COPY_LIMIT_POLICY: &str = "COPY_LIMIT_POLICY";
pub const LABEL_WIDTH_INCHES: &str = "LABEL_WIDTH_INCHES";
pub const LABEL_HEIGHT_INCHES: &str = "LABEL_HEIGHT_INCHES";
pub const IMAGE_DPI: &str = "IMAGE_DPI";
pub const LABEL_BACKGROUND: &str = "LABEL_BACKGROUND";
pub const LABEL_OUTPUT_FORMAT: &str = "LABEL_OUTPUT_FORMAT";
pub const TELEFAX_LOG_DIR: &str = "TELEFAX_LOG_DIR";
pub const RUST_LOG: &str = "RUST_LOG";

/// Overlay the process environment.
pub fn apply_env(config: TelefaxConfig) -> (TelefaxConfig, Vec<ConfigValidationError>) {
    apply_env_with(config, &std::env::vars().collect())
}

/// Overlay variables from a provided map (useful for testing).
pub fn apply_env_with(
    mut config: TelefaxConfig,
    env: &HashMap<String, String>,
) -> (TelefaxConfig, Vec<ConfigValidationError>) {
    let mut overlay = Overlay {
        env,
        warnings: Vec::new(),
    };

    if let Some(token) = overlay.string(TELEGRAM_BOT_TOKEN) {
        config.telegram.bot_token = Some(token);
    }
    if let Some(name) = overlay.string(CUPS_PRINTER_NAME) {
        config.printer.name = Some(name);
    }
    if let Some(host) = overlay.string(CUPS_SERVER_HOST) {
        config.printer.host = Some(host);
    }
    if let Some(secs) = overlay.positive(
        PRINT_TIMEOUT_SECS,
        "printer.timeoutSecs",
        defaults::DEFAULT_PRINT_TIMEOUT_SECS,
    ) {
        config.printer.timeout_secs = secs;
    }

    if let Some(ids) = overlay.string(ALLOWED_USER_IDS) {
        config.access.allowed_senders = split_ids(&ids);
    }
    if let Some(ids) = overlay.string(ADMIN_USER_IDS) {
        config.access.admin_senders = Some(split_ids(&ids));
    }

    if let Some(max) = overlay.positive(MAX_COPIES, "copies.maxCopies", defaults::DEFAULT_MAX_COPIES) {
        config.copies.max_copies = max;
    }
    if let Some(policy) = overlay.parsed::<CopyLimitPolicy>(COPY_LIMIT_POLICY, "copies.policy") {
        config.copies.policy = policy;
    }

    if let Some(width) = overlay.positive(
        LABEL_WIDTH_INCHES,
        "label.widthInches",
        defaults::DEFAULT_LABEL_WIDTH_INCHES,
    ) {
        config.label.width_inches = width;
    }
    if let Some(height) = overlay.positive(
        LABEL_HEIGHT_INCHES,
        "label.heightInches",
        defaults::DEFAULT_LABEL_HEIGHT_INCHES,
    ) {
        config.label.height_inches = height;
    }
    if let Some(dpi) = overlay.positive(IMAGE_DPI, "label.dpi", defaults::DEFAULT_DPI) {
        config.label.dpi = dpi;
    }
    if let Some(background) = overlay.string(LABEL_BACKGROUND) {
        config.label.background = background;
    }
    if let Some(format) = overlay.parsed::<OutputFormat>(LABEL_OUTPUT_FORMAT, "label.outputFormat") {
        config.label.output_format = format;
    }

    if let Some(dir) = overlay.string(TELEFAX_LOG_DIR) {
        config.logging.dir = dir;
    }
    if let Some(level) = overlay.string(RUST_LOG) {
        config.logging.level = level;
    }

    (config, overlay.warnings)
}

/// Comma-separated identifiers, blanks dropped.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

struct Overlay<'a> {
    env: &'a HashMap<String, String>,
    warnings: Vec<ConfigValidationError>,
}

trait Positive: FromStr + PartialOrd + Default + std::fmt::Display + Copy {}

impl Positive for u32 {}
impl Positive for u64 {}
impl Positive for f64 {}

impl Overlay<'_> {
    /// Set, non-blank value.
    fn string(&self, var: &str) -> Option<String> {
        let value = self.env.get(var)?.trim();
        if value.is_empty() {
            return None;
        }
        debug!(var, "Config value taken from environment");
        Some(value.to_string())
    }

    fn warn(&mut self, path: &str, message: String) {
        self.warnings.push(ConfigValidationError {
            path: path.to_string(),
            message,
        });
    }

    /// A number that must be > 0. Anything else yields `default` plus a warning.
    fn positive<T: Positive>(&mut self, var: &str, path: &str, default: T) -> Option<T> {
        let raw = self.string(var)?;
        match raw.parse::<T>() {
            Ok(value) if value > T::default() && is_finite(&raw) => Some(value),
            _ => {
                self.warn(path, format!("{var}=`{raw}` must be a positive number; using {default}"));
                Some(default)
            }
        }
    }

    fn parsed<T: FromStr<Err = telefax_core::TelefaxError>>(&mut self, var: &str, path: &str) -> Option<T> {
        let raw = self.string(var)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                self.warn(path, format!("{var}: {}; keeping configured value", e.user_message()));
                None
            }
        }
    }
}

/// Rejects `inf` / `NaN`, which `f64::from_str` accepts.
fn is_finite(raw: &str) -> bool {
    raw.parse::<f64>().map(f64::is_finite).unwrap_or(true)
}
