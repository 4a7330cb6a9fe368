//! Process-wide runtime configuration.
//!
//! Everything here is fixed at startup except the copy ceiling, which lives
//! behind [`SharedLimits`] and is only written through Admin Control.

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::TelefaxError;
use crate::types::OutputFormat;

/// Ceiling used when nothing else is configured.
pub const DEFAULT_MAX_COPIES: u32 = 100;

/// What to do when a caption asks for more copies than the ceiling allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CopyLimitPolicy {
    /// Silently reduce the request to the ceiling.
    #[default]
    Clamp,
    /// Refuse the request without printing.
    Reject,
}

impl FromStr for CopyLimitPolicy {
    type Err = TelefaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(TelefaxError::InvalidArgument(format!(
                "unknown copy limit policy `{other}` (expected clamp or reject)"
            ))),
        }
    }
}

/// Physical label geometry and output encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: u32,
    pub background: [u8; 3],
    pub output_format: OutputFormat,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            width_inches: 4.0,
            height_inches: 6.0,
            dpi: 300,
            background: [255, 255, 255],
            output_format: OutputFormat::Png,
        }
    }
}

impl LabelSpec {
    pub fn pixel_width(&self) -> u32 {
        inches_to_pixels(self.width_inches, self.dpi)
    }

    pub fn pixel_height(&self) -> u32 {
        inches_to_pixels(self.height_inches, self.dpi)
    }

    /// `Custom.4x6in` style media name understood by CUPS.
    pub fn media_option(&self) -> String {
        format!(
            "media=Custom.{}x{}in",
            format_inches(self.width_inches),
            format_inches(self.height_inches)
        )
    }
}

fn inches_to_pixels(inches: f64, dpi: u32) -> u32 {
    ((inches * dpi as f64) as u32).max(1)
}

fn format_inches(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .strip_suffix(".00")
        .map(str::to_string)
        .unwrap_or(formatted)
}

/// Destination print queue.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterTarget {
    pub device: Option<String>,
    pub host: Option<String>,
    pub timeout: Duration,
}

impl Default for PrinterTarget {
    fn default() -> Self {
        Self {
            device: None,
            host: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Handle to the mutable copy ceiling. Clones share the same value.
#[derive(Debug, Clone)]
pub struct SharedLimits {
    max_copies: Arc<AtomicU32>,
}

impl SharedLimits {
    pub fn new(max_copies: u32) -> Self {
        Self {
            max_copies: Arc::new(AtomicU32::new(max_copies.max(1))),
        }
    }

    pub fn max_copies(&self) -> u32 {
        self.max_copies.load(Ordering::Acquire)
    }

    /// Replace the ceiling and return the previous value.
    pub fn set_max_copies(&self, max_copies: u32) -> Result<u32, TelefaxError> {
        if max_copies == 0 {
            return Err(TelefaxError::InvalidArgument(
                "Maximum copies must be a positive number.".into(),
            ));
        }
        Ok(self.max_copies.swap(max_copies, Ordering::AcqRel))
    }
}

impl Default for SharedLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COPIES)
    }
}

/// Everything a pipeline run reads besides the access lists.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub label: LabelSpec,
    pub printer: PrinterTarget,
    pub copy_policy: CopyLimitPolicy,
    pub limits: SharedLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_label_is_four_by_six_at_300_dpi() {
        let label = LabelSpec::default();
        assert_eq!(label.pixel_width(), 1200);
        assert_eq!(label.pixel_height(), 1800);
    }

    #[test]
    fn fractional_inches_truncate() {
        let label = LabelSpec {
            width_inches: 2.125,
            height_inches: 1.0,
            dpi: 203,
            ..Default::default()
        };
        assert_eq!(label.pixel_width(), 431);
        assert_eq!(label.pixel_height(), 203);
    }

    #[test]
    fn media_option_drops_trailing_zeroes() {
        assert_eq!(LabelSpec::default().media_option(), "media=Custom.4x6in");
        let label = LabelSpec {
            width_inches: 4.25,
            ..Default::default()
        };
        assert_eq!(label.media_option(), "media=Custom.4.25x6in");
    }

    #[test]
    fn set_max_copies_returns_previous() {
        let limits = SharedLimits::new(100);
        assert_eq!(limits.set_max_copies(10).unwrap(), 100);
        assert_eq!(limits.max_copies(), 10);
    }

    #[test]
    fn rejects_zero_ceiling() {
        let limits = SharedLimits::default();
        assert!(limits.set_max_copies(0).is_err());
        assert_eq!(limits.max_copies(), DEFAULT_MAX_COPIES);
    }

    #[test]
    fn clones_share_ceiling() {
        let limits = SharedLimits::default();
        let other = limits.clone();
        other.set_max_copies(7).unwrap();
        assert_eq!(limits.max_copies(), 7);
    }

    #[test]
    fn parses_policy() {
        assert_eq!("Reject".parse::<CopyLimitPolicy>().unwrap(), CopyLimitPolicy::Reject);
        assert!("drop".parse::<CopyLimitPolicy>().is_err());
    }
}
