use anyhow::Result;
use async_trait::async_trait;

use crate::types::{JobOutcome, PrintJob, SenderId};

/// An external print queue that accepts one job carrying N copies.
///
/// Implementations never retry. Failures come back as [`JobOutcome::Rejected`].
#[async_trait]
pub trait PrintBackend: Send + Sync {
    /// Backend name for logging (e.g., "cups").
    fn name(&self) -> &str;

    /// Enqueue exactly one job for `job.copies` duplicates of `job.bitmap`.
    async fn submit_job(&self, job: &PrintJob) -> JobOutcome;
}

/// Outbound text channel back to whoever sent the request.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, sender: &SenderId, text: &str) -> Result<()>;
}
