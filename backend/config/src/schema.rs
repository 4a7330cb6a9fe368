//! Telefax runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section is optional in
//! the file; missing fields take the defaults from [`crate::defaults`].

use serde::{Deserialize, Serialize};
use telefax_core::{CopyLimitPolicy, OutputFormat};

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelefaxConfig {
    pub telegram: TelegramConfig,
    pub printer: PrinterConfig,
    pub access: AccessConfig,
    pub copies: CopiesConfig,
    pub label: LabelConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Telegram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Printer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterConfig {
    /// CUPS queue name.
    pub name: Option<String>,
    /// Remote CUPS server (`host[:port]`).
    pub host: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: None,
            host: None,
            timeout_secs: defaults::DEFAULT_PRINT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    pub allowed_senders: Vec<String>,
    /// Unset means the allow-list also governs admin commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_senders: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Copies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopiesConfig {
    pub max_copies: u32,
    pub policy: CopyLimitPolicy,
}

impl Default for CopiesConfig {
    fn default() -> Self {
        Self {
            max_copies: defaults::DEFAULT_MAX_COPIES,
            policy: CopyLimitPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfig {
    pub width_inches: f64,
    pub height_inches: f64,
    pub dpi: u32,
    /// `#rrggbb`
    pub background: String,
    pub output_format: OutputFormat,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            width_inches: defaults::DEFAULT_LABEL_WIDTH_INCHES,
            height_inches: defaults::DEFAULT_LABEL_HEIGHT_INCHES,
            dpi: defaults::DEFAULT_DPI,
            background: defaults::DEFAULT_BACKGROUND.to_string(),
            output_format: OutputFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    pub dir: String,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: defaults::DEFAULT_LOG_DIR.to_string(),
            level: defaults::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config: TelefaxConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, TelefaxConfig::default());
        assert_eq!(config.label.dpi, 300);
        assert_eq!(config.copies.max_copies, 100);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r#"
printer:
  name: DYMO_4XL
copies:
  policy: reject
label:
  outputFormat: jpeg
access:
  allowedSenders: ["12345", "67890"]
"#;
        let config: TelefaxConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.printer.name.as_deref(), Some("DYMO_4XL"));
        assert_eq!(config.printer.timeout_secs, 30);
        assert_eq!(config.copies.policy, CopyLimitPolicy::Reject);
        assert_eq!(config.copies.max_copies, 100);
        assert_eq!(config.label.output_format, OutputFormat::Jpeg);
        assert_eq!(config.label.width_inches, 4.0);
        assert_eq!(config.access.allowed_senders, vec!["12345", "67890"]);
        assert!(config.access.admin_senders.is_none());
    }
}
