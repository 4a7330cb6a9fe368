use std::sync::Arc;
use std::time::Duration;

use telefax_core::{JobOutcome, LabelBitmap, PrintBackend, PrintJob, RejectReason, TelefaxError};
use tracing::{info, warn};

/// Submits one job per call to the configured backend, bounded by a timeout.
///
/// No retries: a rejection is handed straight back to the caller.
#[derive(Clone)]
pub struct PrintDispatcher {
    backend: Arc<dyn PrintBackend>,
    timeout: Duration,
}

impl PrintDispatcher {
    pub fn new(backend: Arc<dyn PrintBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a job for `copies` duplicates of `bitmap` and submit it.
    pub async fn submit(
        &self,
        bitmap: LabelBitmap,
        copies: u32,
        target_device: &str,
    ) -> Result<JobOutcome, TelefaxError> {
        let job = PrintJob::new(bitmap, copies, target_device)?;
        Ok(self.submit_job(&job).await)
    }

    pub async fn submit_job(&self, job: &PrintJob) -> JobOutcome {
        info!(
            backend = self.backend.name(),
            device = %job.target_device,
            copies = job.copies,
            bytes = job.bitmap.data.len(),
            "Submitting print job"
        );

        match tokio::time::timeout(self.timeout, self.backend.submit_job(job)).await {
            Ok(outcome) => {
                match &outcome {
                    JobOutcome::Accepted { job_id } => {
                        info!(job_id = %job_id, copies = job.copies, "Print job accepted")
                    }
                    JobOutcome::Rejected { reason } => {
                        warn!(reason = %reason, "Print job rejected")
                    }
                }
                outcome
            }
            Err(_) => {
                let after_secs = self.timeout.as_secs();
                warn!(after_secs, backend = self.backend.name(), "Print backend timed out");
                JobOutcome::Rejected {
                    reason: RejectReason::Timeout { after_secs },
                }
            }
        }
    }
}
