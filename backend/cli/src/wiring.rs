//! Builds the print pipeline from a loaded config.

use std::sync::Arc;

use telefax_config::TelefaxConfig;
use telefax_core::{PrintBackend, SenderId};
use telefax_pipeline::PrintPipeline;
use telefax_printing::{LpBackend, LpConfig, PrintDispatcher};

/// `lp` backend configured for the label geometry and CUPS host.
pub fn lp_backend(config: &TelefaxConfig) -> Arc<dyn PrintBackend> {
    let (_, runtime) = config.runtime();
    Arc::new(LpBackend::new(LpConfig {
        host: runtime.printer.host.clone(),
        media: Some(runtime.label.media_option()),
        ..Default::default()
    }))
}

/// Pipeline over `backend`. `extra_sender` is added to the allow-list.
pub fn build_pipeline(
    config: &TelefaxConfig,
    backend: Arc<dyn PrintBackend>,
    extra_sender: Option<SenderId>,
) -> PrintPipeline {
    let (mut access, runtime) = config.runtime();
    if let Some(sender) = extra_sender {
        access.allow(sender);
    }
    let dispatcher = PrintDispatcher::new(backend, runtime.printer.timeout);
    PrintPipeline::new(Arc::new(access), runtime, dispatcher)
}
