//! `telefax config`: print the redacted effective config and its report.

use std::path::Path;

use anyhow::Result;
use telefax_config::{load_and_prepare, redact};

use crate::terminal_output::print_report;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, report) = load_and_prepare(config_path).await?;

    println!("{}", serde_json::to_string_pretty(&redact(&config))?);
    println!();
    print_report(&report);
    Ok(())
}
