//! `telefax serve`: run the Telegram bot until Ctrl-C.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use telefax_channels::{ChannelAdapter, TelegramAdapter};
use telefax_commands::build_default_dispatcher;
use telefax_config::{load_and_prepare, log_report};
use tracing::info;

use crate::wiring::{build_pipeline, lp_backend};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let (config, report) = load_and_prepare(config_path).await?;
    telefax_logging::init_logger(&config.logging.dir, &config.logging.level);
    log_report(&report);

    if !report.is_valid() {
        let fields: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        bail!("Refusing to start with an invalid config ({})", fields.join(", "));
    }
    let Some(token) = config.telegram.bot_token.clone() else {
        bail!("TELEGRAM_BOT_TOKEN is not set");
    };

    let pipeline = build_pipeline(&config, lp_backend(&config), None);
    let commands = Arc::new(build_default_dispatcher(&pipeline));

    info!(
        printer = ?config.printer.name,
        host = ?config.printer.host,
        allowed = config.access.allowed_senders.len(),
        max_copies = config.copies.max_copies,
        label = %format!("{}x{}in@{}dpi", config.label.width_inches, config.label.height_inches, config.label.dpi),
        "Starting Telefax"
    );

    let adapter = TelegramAdapter::new(token, Arc::new(pipeline), commands);
    adapter.start().await?;
    info!(adapter = adapter.name(), "Shut down");
    Ok(())
}
