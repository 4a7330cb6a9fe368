//! Request-to-print pipeline.
//!
//! Stages run strictly in order: access check, copy resolution,
//! normalization, dispatch. The only shared mutable state is the copy
//! ceiling, read once per request; no lock is held across the slow stages.

use std::sync::Arc;

use telefax_core::{
    copies_label, JobOutcome, PrintRequest, ReplySink, RuntimeConfig, SenderId, TelefaxError,
};
use telefax_logging::{PrintEvent, PrintEventLogger};
use telefax_media::ImageNormalizer;
use telefax_printing::PrintDispatcher;
use telefax_security::AccessPolicy;
use tracing::{error, info, warn};

use crate::admin::AdminControl;
use crate::copies::{apply_policy, resolve};

/// Result of a successfully submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintReceipt {
    pub job_id: String,
    pub copies: u32,
    /// The caption asked for more than the ceiling allowed.
    pub clamped: bool,
}

#[derive(Clone)]
pub struct PrintPipeline {
    access: Arc<AccessPolicy>,
    config: RuntimeConfig,
    normalizer: ImageNormalizer,
    dispatcher: PrintDispatcher,
}

impl PrintPipeline {
    pub fn new(access: Arc<AccessPolicy>, config: RuntimeConfig, dispatcher: PrintDispatcher) -> Self {
        let normalizer = ImageNormalizer::new(config.label.clone());
        Self {
            access,
            config,
            normalizer,
            dispatcher,
        }
    }

    /// Shared handle to the access policy this pipeline enforces.
    pub fn access(&self) -> Arc<AccessPolicy> {
        Arc::clone(&self.access)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Admin Control sharing this pipeline's access policy and copy ceiling.
    pub fn admin(&self) -> AdminControl {
        AdminControl::new(Arc::clone(&self.access), self.config.limits.clone())
    }

    pub fn is_authorized(&self, sender: &SenderId) -> bool {
        self.access.authorize(sender)
    }

    /// Handle one inbound image and report the outcome to the sender.
    ///
    /// Every failure is answered with a reply; the error is also returned so
    /// the transport can log it.
    pub async fn on_image_received(
        &self,
        request: PrintRequest,
        reply: &dyn ReplySink,
    ) -> Result<PrintReceipt, TelefaxError> {
        let sender = request.sender.clone();
        let request_id = request.id;

        let result = self.process(request, reply).await;
        let text = match &result {
            Ok(receipt) => format!(
                "Sent {} to printer! Job: {}",
                copies_label(receipt.copies),
                receipt.job_id
            ),
            Err(e) => {
                if e.is_system_fault() {
                    error!(request_id = %request_id, error = %e, "Print request failed");
                }
                e.user_message()
            }
        };
        send(reply, &sender, &text).await;
        result
    }

    /// Run the stages without sending the final outcome reply.
    pub async fn process(
        &self,
        request: PrintRequest,
        reply: &dyn ReplySink,
    ) -> Result<PrintReceipt, TelefaxError> {
        let PrintRequest {
            id: request_id,
            sender,
            image,
            caption,
            ..
        } = request;

        if let Err(e) = self.access.check(&sender) {
            PrintEventLogger::log_event(
                request_id,
                PrintEvent::Unauthorized {
                    sender: sender.to_string(),
                },
            );
            return Err(e);
        }

        PrintEventLogger::log_event(
            request_id,
            PrintEvent::Received {
                sender: sender.to_string(),
                bytes: image.len(),
                has_caption: caption.as_deref().is_some_and(|c| !c.trim().is_empty()),
            },
        );

        let device = self
            .config
            .printer
            .device
            .clone()
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| TelefaxError::ConfigError("no print device configured".into()))?;

        let max_copies = self.config.limits.max_copies();
        let resolution = resolve(caption.as_deref(), max_copies);
        let copies = apply_policy(&resolution, self.config.copy_policy, max_copies)?;
        if resolution.clamped {
            info!(
                request_id = %request_id,
                requested = ?resolution.requested,
                copies,
                "Copy request reduced to ceiling"
            );
        }

        let label = &self.config.label;
        send(
            reply,
            &sender,
            &format!(
                "Received image. Resizing for {}x{}in label and preparing to print {}...",
                label.width_inches,
                label.height_inches,
                copies_label(copies)
            ),
        )
        .await;

        let normalizer = self.normalizer.clone();
        let bitmap = tokio::task::spawn_blocking(move || normalizer.normalize(&image))
            .await
            .map_err(|e| TelefaxError::Other(anyhow::anyhow!("normalizer task failed: {e}")))?;
        let bitmap = match bitmap {
            Ok(bitmap) => bitmap,
            Err(e) => {
                if let TelefaxError::Decode(msg) = &e {
                    PrintEventLogger::log_event(
                        request_id,
                        PrintEvent::DecodeFailed {
                            error_msg: msg.clone(),
                        },
                    );
                }
                return Err(e);
            }
        };

        match self.dispatcher.submit(bitmap, copies, &device).await? {
            JobOutcome::Accepted { job_id } => {
                PrintEventLogger::log_event(
                    request_id,
                    PrintEvent::Submitted {
                        job_id: job_id.clone(),
                        copies,
                    },
                );
                Ok(PrintReceipt {
                    job_id,
                    copies,
                    clamped: resolution.clamped,
                })
            }
            JobOutcome::Rejected { reason } => {
                PrintEventLogger::log_event(
                    request_id,
                    PrintEvent::Rejected {
                        reason: reason.to_string(),
                    },
                );
                Err(TelefaxError::PrintRejected { reason })
            }
        }
    }
}

async fn send(reply: &dyn ReplySink, sender: &SenderId, text: &str) {
    if let Err(e) = reply.send_reply(sender, text).await {
        warn!(sender = %sender, error = %e, "Failed to send reply");
    }
}
