//! `telefax-config`: Telefax runtime configuration management.
//!
//! Provides:
//! - Typed config schema
//! - Optional YAML file, overlaid by environment variables
//! - Default repair for unusable values
//! - Validation report
//! - Config redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, parse_hex_color};
pub use env::{apply_env, apply_env_with};
pub use io::{load_config, parse_config, CONFIG_PATH_VAR};
pub use redact::redact;
pub use schema::TelefaxConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use telefax_core::{LabelSpec, PrinterTarget, RuntimeConfig, SenderId, SharedLimits};
use telefax_security::AccessPolicy;

/// Load the optional file, overlay the environment, repair defaults and validate.
///
/// This is the main entry point for loading a config at runtime. Nothing is
/// logged here so callers can install the subscriber from the loaded config
/// first and then pass the report to [`log_report`].
pub async fn load_and_prepare(path: Option<&Path>) -> Result<(TelefaxConfig, ValidationReport)> {
    let file = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

    let config = match &file {
        Some(path) => load_config(path).await?,
        None => TelefaxConfig::default(),
    };

    let (config, env_warnings) = apply_env(config);
    Ok(prepare(config, env_warnings))
}

pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}

/// Repair defaults and validate an already-overlaid config.
pub fn prepare(
    config: TelefaxConfig,
    env_warnings: Vec<ConfigValidationError>,
) -> (TelefaxConfig, ValidationReport) {
    let (config, default_warnings) = apply_all_defaults(config);
    let mut report = validate(&config);
    let mut warnings = env_warnings;
    warnings.extend(default_warnings);
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    (config, report)
}

impl TelefaxConfig {
    /// Build the access policy and the runtime settings the pipeline reads.
    ///
    /// The returned [`RuntimeConfig`] owns a fresh [`SharedLimits`] seeded
    /// from `copies.maxCopies`; clones of it share the live ceiling.
    pub fn runtime(&self) -> (AccessPolicy, RuntimeConfig) {
        let access = AccessPolicy::new(
            self.access.allowed_senders.iter().map(SenderId::new),
            self.access
                .admin_senders
                .as_ref()
                .map(|ids| ids.iter().map(SenderId::new).collect()),
        );

        let label = LabelSpec {
            width_inches: self.label.width_inches,
            height_inches: self.label.height_inches,
            dpi: self.label.dpi,
            background: parse_hex_color(&self.label.background).unwrap_or([255, 255, 255]),
            output_format: self.label.output_format,
        };

        let printer = PrinterTarget {
            device: non_blank(self.printer.name.as_deref()),
            host: non_blank(self.printer.host.as_deref()),
            timeout: Duration::from_secs(self.printer.timeout_secs.max(1)),
        };

        let runtime = RuntimeConfig {
            label,
            printer,
            copy_policy: self.copies.policy,
            limits: SharedLimits::new(self.copies.max_copies),
        };
        (access, runtime)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use telefax_core::{CopyLimitPolicy, OutputFormat};

    #[test]
    fn runtime_reflects_config() {
        let env: HashMap<String, String> = [
            ("CUPS_PRINTER_NAME", "DYMO_4XL"),
            ("ALLOWED_USER_IDS", "111,222"),
            ("ADMIN_USER_IDS", "111"),
            ("MAX_COPIES", "20"),
            ("COPY_LIMIT_POLICY", "reject"),
            ("LABEL_BACKGROUND", "#102030"),
            ("LABEL_OUTPUT_FORMAT", "jpg"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let (config, _) = apply_env_with(TelefaxConfig::default(), &env);
        let (access, runtime) = config.runtime();

        assert!(access.authorize(&SenderId::from("222")));
        assert!(!access.authorize(&SenderId::from("333")));
        assert!(access.authorize_admin(&SenderId::from("111")));
        assert!(!access.authorize_admin(&SenderId::from("222")));

        assert_eq!(runtime.printer.device.as_deref(), Some("DYMO_4XL"));
        assert_eq!(runtime.printer.timeout, Duration::from_secs(30));
        assert_eq!(runtime.limits.max_copies(), 20);
        assert_eq!(runtime.copy_policy, CopyLimitPolicy::Reject);
        assert_eq!(runtime.label.background, [0x10, 0x20, 0x30]);
        assert_eq!(runtime.label.output_format, OutputFormat::Jpeg);
        assert_eq!(runtime.label.pixel_width(), 1200);
    }

    #[test]
    fn default_runtime_admits_nobody() {
        let (access, runtime) = TelefaxConfig::default().runtime();
        assert!(access.is_empty());
        assert!(runtime.printer.device.is_none());
        assert_eq!(runtime.limits.max_copies(), 100);
    }

    #[test]
    fn prepare_merges_warnings() {
        let mut config = TelefaxConfig::default();
        config.copies.max_copies = 0;
        let env_warning = ConfigValidationError {
            path: "label.dpi".into(),
            message: "from env".into(),
        };
        let (config, report) = prepare(config, vec![env_warning]);
        assert_eq!(config.copies.max_copies, 100);
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["label.dpi", "copies.maxCopies", "access.allowedSenders"]);
        assert!(!report.is_valid());
    }
}
