/// Built-in command handlers.
use anyhow::Result;
use async_trait::async_trait;
use telefax_core::{LabelSpec, PrinterTarget, SharedLimits, TelefaxError};
use telefax_pipeline::{AdminControl, PrintPipeline};
use telefax_security::AccessPolicy;
use std::sync::Arc;

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// /start
// ---------------------------------------------------------------------------

pub struct StartHandler {
    label: LabelSpec,
    printer: PrinterTarget,
}

impl StartHandler {
    pub fn new(pipeline: &PrintPipeline) -> Self {
        Self {
            label: pipeline.config().label.clone(),
            printer: pipeline.config().printer.clone(),
        }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    async fn handle(&self, _ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        let mut text = format!(
            "Welcome to Telefax! Send me an image and I'll print it on a {}x{}in label.\n\
             Add a caption like \"3 copies\" to print more than one. Use /help for details.",
            self.label.width_inches, self.label.height_inches
        );
        if self.printer.device.as_deref().map_or(true, |d| d.trim().is_empty()) {
            text.push_str("\n\nWarning: no printer is configured yet, so print requests will fail.");
        }
        Ok(CommandResponse::ok(text))
    }
}

// ---------------------------------------------------------------------------
// /help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    registry: CommandRegistry,
    access: Arc<AccessPolicy>,
    label: LabelSpec,
    limits: SharedLimits,
}

impl HelpHandler {
    pub fn new(pipeline: &PrintPipeline) -> Self {
        Self {
            registry: CommandRegistry::new(),
            access: pipeline.access(),
            label: pipeline.config().label.clone(),
            limits: pipeline.config().limits.clone(),
        }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        let authorized = self.access.authorize(&ctx.sender_id);
        let admin = self.access.authorize_admin(&ctx.sender_id);

        let mut lines = vec!["Telefax commands:".to_string()];
        for cmd in self.registry.all() {
            if cmd.admin_only && !admin {
                continue;
            }
            lines.push(format!("{} - {}", cmd.usage(), cmd.description));
        }

        if authorized {
            lines.push(String::new());
            lines.push(format!(
                "Send an image to print it on a {}x{}in label at {} dpi.",
                self.label.width_inches, self.label.height_inches, self.label.dpi
            ));
            lines.push(
                "Set copies in the caption: \"3 copies\", \"copies: 5\", \"copies=5\", \"x3\" or just \"3\"."
                    .to_string(),
            );
            lines.push(format!("Maximum copies per request: {}.", self.limits.max_copies()));
        } else {
            lines.push(String::new());
            lines.push("You are not on the allow-list for this printer.".to_string());
        }

        Ok(CommandResponse::ok(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// /setmaxcopies
// ---------------------------------------------------------------------------

pub struct SetMaxCopiesHandler {
    admin: AdminControl,
}

impl SetMaxCopiesHandler {
    pub fn new(admin: AdminControl) -> Self {
        Self { admin }
    }
}

#[async_trait]
impl CommandHandler for SetMaxCopiesHandler {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        let text = match self.set(ctx, inv) {
            Ok(new) => format!("Maximum copies per request set to {new} for this session."),
            Err(TelefaxError::Unauthorized { .. }) => {
                "Sorry, you are not authorized to use this command.".to_string()
            }
            Err(e) => e.user_message(),
        };
        Ok(CommandResponse::ok(text))
    }
}

impl SetMaxCopiesHandler {
    fn set(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<u32, TelefaxError> {
        if inv.args.len() != 1 {
            // Unauthorized senders get the refusal, not the usage hint.
            self.admin.check(&ctx.sender_id)?;
            return Err(TelefaxError::InvalidArgument("Usage: /setmaxcopies <number>".into()));
        }
        Ok(self.admin.set_max_copies(&ctx.sender_id, &inv.args[0])?.new)
    }
}

// ---------------------------------------------------------------------------
// /whoami
// ---------------------------------------------------------------------------

pub struct WhoAmIHandler;

#[async_trait]
impl CommandHandler for WhoAmIHandler {
    async fn handle(&self, ctx: &CommandContext, _inv: &CommandInvocation) -> Result<CommandResponse> {
        Ok(CommandResponse::ok(format!(
            "Your {} id is {}. Give it to the administrator to be added to the allow-list.",
            ctx.channel, ctx.sender_id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_dispatcher;
    use std::time::Duration;
    use telefax_core::{JobOutcome, PrintBackend, PrintJob, RuntimeConfig, SenderId};
    use telefax_printing::PrintDispatcher;

    struct NullBackend;

    #[async_trait]
    impl PrintBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        async fn submit_job(&self, _job: &PrintJob) -> JobOutcome {
            JobOutcome::Accepted { job_id: "null-1".into() }
        }
    }

    fn pipeline(device: Option<&str>) -> PrintPipeline {
        let mut config = RuntimeConfig::default();
        config.printer.device = device.map(str::to_string);
        PrintPipeline::new(
            Arc::new(AccessPolicy::new([SenderId::from("42")], None)),
            config,
            PrintDispatcher::new(Arc::new(NullBackend), Duration::from_secs(5)),
        )
    }

    #[test]
    fn help_shares_the_pipeline_policy() {
        let pipeline = pipeline(None);
        let help = HelpHandler::new(&pipeline);
        assert!(Arc::ptr_eq(&help.access, &pipeline.access()));
    }

    fn ctx(sender: &str) -> CommandContext {
        CommandContext {
            channel: "telegram".into(),
            sender_id: SenderId::from(sender),
        }
    }

    async fn reply(pipeline: &PrintPipeline, sender: &str, text: &str) -> Option<String> {
        let dispatcher = build_default_dispatcher(pipeline);
        dispatcher
            .handle_text(&ctx(sender), text)
            .await
            .map(|r| r.unwrap().text)
    }

    #[tokio::test]
    async fn start_warns_without_printer() {
        let text = reply(&pipeline(None), "42", "/start").await.unwrap();
        assert!(text.contains("4x6in"));
        assert!(text.contains("no printer is configured"));

        let text = reply(&pipeline(Some("DYMO")), "42", "/start").await.unwrap();
        assert!(!text.contains("no printer is configured"));
    }

    #[tokio::test]
    async fn help_hides_admin_commands_from_strangers() {
        let p = pipeline(Some("DYMO"));
        let text = reply(&p, "42", "/help").await.unwrap();
        assert!(text.contains("/setmaxcopies <number>"));
        assert!(text.contains("Maximum copies per request: 100."));

        let text = reply(&p, "7", "/help").await.unwrap();
        assert!(!text.contains("/setmaxcopies"));
        assert!(!text.contains("copies:"));
        assert!(text.contains("not on the allow-list"));
    }

    #[tokio::test]
    async fn setmaxcopies_updates_shared_ceiling() {
        let p = pipeline(Some("DYMO"));
        let text = reply(&p, "42", "/setmaxcopies 10").await.unwrap();
        assert_eq!(text, "Maximum copies per request set to 10 for this session.");
        assert_eq!(p.config().limits.max_copies(), 10);

        let help = reply(&p, "42", "/help").await.unwrap();
        assert!(help.contains("Maximum copies per request: 10."));
    }

    #[tokio::test]
    async fn setmaxcopies_refuses_strangers() {
        let p = pipeline(Some("DYMO"));
        for text in ["/setmaxcopies 10", "/setmaxcopies"] {
            assert_eq!(
                reply(&p, "7", text).await.unwrap(),
                "Sorry, you are not authorized to use this command."
            );
        }
        assert_eq!(p.config().limits.max_copies(), 100);
    }

    #[tokio::test]
    async fn setmaxcopies_validates_arguments() {
        let p = pipeline(Some("DYMO"));
        assert_eq!(
            reply(&p, "42", "/setmaxcopies").await.unwrap(),
            "Usage: /setmaxcopies <number>"
        );
        assert_eq!(
            reply(&p, "42", "/setmaxcopies 1 2").await.unwrap(),
            "Usage: /setmaxcopies <number>"
        );
        assert_eq!(
            reply(&p, "42", "/setmaxcopies ten").await.unwrap(),
            "Invalid number provided. Please enter a whole number."
        );
        assert_eq!(
            reply(&p, "42", "/setmaxcopies 0").await.unwrap(),
            "Maximum copies must be a positive number."
        );
        assert_eq!(p.config().limits.max_copies(), 100);
    }

    #[tokio::test]
    async fn whoami_echoes_sender() {
        let text = reply(&pipeline(None), "7", "/whoami").await.unwrap();
        assert!(text.contains("telegram id is 7"));
    }

    #[tokio::test]
    async fn unknown_and_plain_text() {
        let p = pipeline(None);
        assert_eq!(
            reply(&p, "42", "/print@TelefaxBot now").await.unwrap(),
            "Unknown command /print. Try /help to see what I can do."
        );
        assert!(reply(&p, "42", "hello").await.is_none());
    }
}
