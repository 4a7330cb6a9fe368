//! `telefax print`: send one local image through the full pipeline.

use std::path::Path;

use anyhow::{bail, Context, Result};
use telefax_config::{load_and_prepare, log_report};
use telefax_core::{PrintRequest, SenderId};

use crate::terminal_output::{note_error, StdoutReplySink};
use crate::wiring::{build_pipeline, lp_backend};

/// Identity of the operator running the CLI. Always on the allow-list.
pub const LOCAL_OPERATOR: &str = "local";

pub async fn run(config_path: Option<&Path>, image: &Path, caption: Option<String>) -> Result<()> {
    let (config, report) = load_and_prepare(config_path).await?;
    telefax_logging::init_console_logger(&config.logging.level);
    log_report(&report);

    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let sender = SenderId::from(LOCAL_OPERATOR);
    let pipeline = build_pipeline(&config, lp_backend(&config), Some(sender.clone()));
    let request = PrintRequest::new(sender, bytes, caption);

    match pipeline.on_image_received(request, &StdoutReplySink).await {
        Ok(_) => Ok(()),
        Err(e) => {
            note_error(&e.to_string());
            bail!("Print failed")
        }
    }
}
