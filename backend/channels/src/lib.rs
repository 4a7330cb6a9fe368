use async_trait::async_trait;

// --------------- Adapters ---------------
pub mod inbound;
pub mod telegram;

pub use inbound::{classify, sender_identity, DocumentInfo, InboundKind};
pub use telegram::{TelegramAdapter, TelegramReplySink};

/// All channel adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Run the adapter's receive loop until shutdown.
    async fn start(&self) -> anyhow::Result<()>;
}
