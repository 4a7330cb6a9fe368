/// Command dispatch: route detected commands to handler functions.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use telefax_core::SenderId;
use tracing::info;

use crate::detection::{detect_command, split_alias};
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub channel: String,
    pub sender_id: SenderId,
}

/// The text reply to send back for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: String,
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry, handlers: HashMap::new() }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        inv: &CommandInvocation,
    ) -> Result<CommandResponse> {
        if let Some(handler) = self.handlers.get(&inv.key) {
            info!("[Commands] Dispatching /{} from {} on {}", inv.key, ctx.sender_id, ctx.channel);
            handler.handle(ctx, inv).await
        } else {
            Ok(CommandResponse::ok(format!("No handler registered for command /{}", inv.key)))
        }
    }

    /// Handle a text message. Returns `None` when the text is not a slash command.
    pub async fn handle_text(&self, ctx: &CommandContext, text: &str) -> Option<Result<CommandResponse>> {
        let trimmed = text.trim();
        if !trimmed.starts_with('/') {
            return None;
        }
        match detect_command(trimmed, &self.registry) {
            Some(inv) => Some(self.dispatch(ctx, &inv).await),
            None => {
                let (alias, _) = split_alias(trimmed);
                Some(Ok(CommandResponse::ok(format!(
                    "Unknown command {alias}. Try /help to see what I can do."
                ))))
            }
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self { Self::new(CommandRegistry::new()) }
}
