//! `telefax normalize`: preview the label a picture would print as.

use std::path::Path;

use anyhow::{Context, Result};
use telefax_config::{load_and_prepare, log_report, TelefaxConfig};
use telefax_core::LabelBitmap;
use telefax_media::{format_for_path, ImageNormalizer};
use tracing::warn;

use crate::terminal_output::note_success;

pub async fn run(config_path: Option<&Path>, input: &Path, output: &Path) -> Result<()> {
    let (config, report) = load_and_prepare(config_path).await?;
    telefax_logging::init_console_logger(&config.logging.level);
    log_report(&report);

    let bitmap = normalize_file(&config, input, output).await?;
    note_success(&format!(
        "Wrote {}x{} {} label to {}",
        bitmap.width,
        bitmap.height,
        bitmap.format.extension(),
        output.display()
    ));
    Ok(())
}

async fn normalize_file(config: &TelefaxConfig, input: &Path, output: &Path) -> Result<LabelBitmap> {
    let (_, runtime) = config.runtime();
    let mut label = runtime.label;
    match format_for_path(output) {
        Some(format) => label.output_format = format,
        None => warn!(
            output = %output.display(),
            format = label.output_format.extension(),
            "Unrecognized output extension; using configured format"
        ),
    }

    let bytes = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read image: {}", input.display()))?;

    let normalizer = ImageNormalizer::new(label);
    let bitmap = tokio::task::spawn_blocking(move || normalizer.normalize(&bytes))
        .await
        .context("normalizer task failed")??;

    tokio::fs::write(output, &bitmap.data)
        .await
        .with_context(|| format!("Failed to write label: {}", output.display()))?;
    Ok(bitmap)
}
