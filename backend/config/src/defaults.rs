//! Config defaults, and repair of values that cannot be used as configured.

use crate::schema::TelefaxConfig;
use crate::validation::ConfigValidationError;

pub const DEFAULT_PRINT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_MAX_COPIES: u32 = telefax_core::DEFAULT_MAX_COPIES;

pub const DEFAULT_LABEL_WIDTH_INCHES: f64 = 4.0;

pub const DEFAULT_LABEL_HEIGHT_INCHES: f64 = 6.0;

pub const DEFAULT_DPI: u32 = 300;

/// Upper bound on the label canvas, in pixels.
pub const MAX_LABEL_PIXELS: u64 = 40_000_000;

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Reset unusable values to their defaults, one warning per reset.
pub fn apply_all_defaults(mut config: TelefaxConfig) -> (TelefaxConfig, Vec<ConfigValidationError>) {
    let mut warnings = Vec::new();
    let mut reset = |path: &str, message: String| {
        warnings.push(ConfigValidationError {
            path: path.to_string(),
            message,
        });
    };

    if config.printer.timeout_secs == 0 {
        reset(
            "printer.timeoutSecs",
            format!("must be > 0; using {DEFAULT_PRINT_TIMEOUT_SECS}"),
        );
        config.printer.timeout_secs = DEFAULT_PRINT_TIMEOUT_SECS;
    }
    if config.copies.max_copies == 0 {
        reset(
            "copies.maxCopies",
            format!("must be > 0; using {DEFAULT_MAX_COPIES}"),
        );
        config.copies.max_copies = DEFAULT_MAX_COPIES;
    }
    if !is_positive(config.label.width_inches) {
        reset(
            "label.widthInches",
            format!("must be > 0; using {DEFAULT_LABEL_WIDTH_INCHES}"),
        );
        config.label.width_inches = DEFAULT_LABEL_WIDTH_INCHES;
    }
    if !is_positive(config.label.height_inches) {
        reset(
            "label.heightInches",
            format!("must be > 0; using {DEFAULT_LABEL_HEIGHT_INCHES}"),
        );
        config.label.height_inches = DEFAULT_LABEL_HEIGHT_INCHES;
    }
    if config.label.dpi == 0 {
        reset("label.dpi", format!("must be > 0; using {DEFAULT_DPI}"));
        config.label.dpi = DEFAULT_DPI;
    }
    let pixels = label_pixels(config.label.width_inches, config.label.dpi)
        .saturating_mul(label_pixels(config.label.height_inches, config.label.dpi));
    if pixels > MAX_LABEL_PIXELS {
        reset(
            "label",
            format!(
                "{}x{} in at {} dpi exceeds {MAX_LABEL_PIXELS} pixels; using {DEFAULT_LABEL_WIDTH_INCHES}x{DEFAULT_LABEL_HEIGHT_INCHES} in at {DEFAULT_DPI} dpi",
                config.label.width_inches, config.label.height_inches, config.label.dpi
            ),
        );
        config.label.width_inches = DEFAULT_LABEL_WIDTH_INCHES;
        config.label.height_inches = DEFAULT_LABEL_HEIGHT_INCHES;
        config.label.dpi = DEFAULT_DPI;
    }
    if parse_hex_color(&config.label.background).is_none() {
        reset(
            "label.background",
            format!(
                "`{}` is not a #rrggbb color; using {DEFAULT_BACKGROUND}",
                config.label.background
            ),
        );
        config.label.background = DEFAULT_BACKGROUND.to_string();
    }
    if config.logging.level.trim().is_empty() {
        config.logging.level = DEFAULT_LOG_LEVEL.to_string();
    }
    if config.logging.dir.trim().is_empty() {
        config.logging.dir = DEFAULT_LOG_DIR.to_string();
    }

    (config, warnings)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

// Float-to-int `as` saturates, so huge sizes stay huge.
fn label_pixels(inches: f64, dpi: u32) -> u64 {
    (inches * f64::from(dpi)) as u64
}

/// Parse `#rrggbb` (the `#` is optional).
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
