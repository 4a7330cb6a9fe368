use std::sync::Arc;

use crate::ChannelAdapter;
use crate::inbound::{classify, sender_identity, DocumentInfo, InboundKind};
use anyhow::Context;
use async_trait::async_trait;
use telefax_commands::{CommandContext, CommandDispatcher};
use telefax_core::{PrintRequest, ReplySink, SenderId};
use telefax_logging::redact_sensitive_data;
use telefax_pipeline::PrintPipeline;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, FileMeta};
use tracing::{debug, error, info, warn};

const CHANNEL: &str = "telegram";

/// Long-polling Telegram transport feeding the print pipeline.
pub struct TelegramAdapter {
    bot: Bot,
    pipeline: Arc<PrintPipeline>,
    commands: Arc<CommandDispatcher>,
}

impl TelegramAdapter {
    pub fn new(token: String, pipeline: Arc<PrintPipeline>, commands: Arc<CommandDispatcher>) -> Self {
        Self {
            bot: Bot::new(token),
            pipeline,
            commands,
        }
    }

    /// Publish the command list shown in Telegram's menu.
    async fn register_commands(&self) {
        let commands: Vec<BotCommand> = self
            .commands
            .registry()
            .all()
            .iter()
            .map(|cmd| BotCommand::new(cmd.key.clone(), cmd.description.clone()))
            .collect();
        if let Err(e) = self.bot.set_my_commands(commands).await {
            warn!(error = %redact_sensitive_data(&e.to_string()), "Failed to register bot commands");
        }
    }
}

#[async_trait]
impl ChannelAdapter for TelegramAdapter {
    fn name(&self) -> &str { CHANNEL }

    async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Telegram adapter");
        self.register_commands().await;

        let handler = Update::filter_message().endpoint(
            |bot: Bot,
             msg: Message,
             pipeline: Arc<PrintPipeline>,
             commands: Arc<CommandDispatcher>| async move {
                if let Err(e) = handle_message(&bot, &msg, &pipeline, &commands).await {
                    error!(
                        chat_id = msg.chat.id.0,
                        error = %redact_sensitive_data(&format!("{e:#}")),
                        "Failed to handle Telegram message"
                    );
                }
                respond(())
            },
        );

        Dispatcher::builder(self.bot.clone(), handler)
            .dependencies(dptree::deps![Arc::clone(&self.pipeline), Arc::clone(&self.commands)])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram adapter stopped");
        Ok(())
    }
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    pipeline: &PrintPipeline,
    commands: &CommandDispatcher,
) -> anyhow::Result<()> {
    // Authorize the user; group chats share one chat id across members.
    let sender = sender_identity(msg.from.as_ref().map(|u| u.id.0));
    let sink = TelegramReplySink::new(bot.clone(), msg.chat.id);

    let photo = msg
        .photo()
        .and_then(|sizes| sizes.iter().max_by_key(|p| u64::from(p.width) * u64::from(p.height)))
        .map(|p| p.file.clone());
    let document = msg.document().map(|doc| DocumentInfo {
        file: doc.file.clone(),
        mime: doc.mime_type.as_ref().map(|m| m.essence_str()),
        file_name: doc.file_name.as_deref(),
    });

    match classify(msg.text(), msg.caption(), photo, document) {
        InboundKind::Command(text) => {
            let ctx = CommandContext {
                channel: CHANNEL.to_string(),
                sender_id: sender.clone(),
            };
            if let Some(result) = commands.handle_text(&ctx, &text).await {
                let response = result.context("command handler failed")?;
                sink.send_reply(&sender, &response.text).await?;
            }
        }
        InboundKind::Image { file, caption } => {
            // Unauthorized senders are turned away before anything is downloaded.
            let image = if pipeline.is_authorized(&sender) {
                match download(bot, file).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(sender = %sender, error = %redact_sensitive_data(&format!("{e:#}")), "Image download failed");
                        sink.send_reply(&sender, "Failed to download the image from Telegram. Please try again.")
                            .await?;
                        return Ok(());
                    }
                }
            } else {
                Vec::new()
            };

            let request = PrintRequest::new(sender, image, caption);
            // The pipeline has already replied and logged faults.
            if let Err(e) = pipeline.on_image_received(request, &sink).await {
                debug!(chat_id = msg.chat.id.0, error = %e, "Print request not completed");
            }
        }
        InboundKind::NotAnImage { mime } => {
            info!(sender = %sender, mime = %mime, "Ignoring non-image document");
            sink.send_reply(&sender, "Only images can be printed. Please send a photo or an image file.")
                .await?;
        }
        InboundKind::Text => {
            sink.send_reply(&sender, "Send me an image to print it. Use /help for details.")
                .await?;
        }
        InboundKind::Ignored => {}
    }
    Ok(())
}

async fn download(bot: &Bot, meta: FileMeta) -> anyhow::Result<Vec<u8>> {
    let file = bot.get_file(meta.id).await.context("getFile failed")?;
    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .context("file download failed")?;
    info!(bytes = buf.len(), "Downloaded Telegram file");
    Ok(buf)
}

/// Sends pipeline replies back to the chat the message came from.
#[derive(Clone)]
pub struct TelegramReplySink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramReplySink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ReplySink for TelegramReplySink {
    async fn send_reply(&self, _sender: &SenderId, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .with_context(|| format!("sendMessage to chat {} failed", self.chat_id.0))?;
        Ok(())
    }
}
