pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

use std::sync::Arc;

use telefax_pipeline::PrintPipeline;

pub use detection::detect_command;
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler, CommandResponse};
pub use handlers::{HelpHandler, SetMaxCopiesHandler, StartHandler, WhoAmIHandler};
pub use registry::{builtin_commands, CommandRegistry};
pub use types::{ArgType, CommandArg, CommandDef, CommandInvocation};

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher(pipeline: &PrintPipeline) -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new(CommandRegistry::new());

    dispatcher.register("start", Arc::new(StartHandler::new(pipeline)));
    dispatcher.register("help", Arc::new(HelpHandler::new(pipeline)));
    dispatcher.register("setmaxcopies", Arc::new(SetMaxCopiesHandler::new(pipeline.admin())));
    dispatcher.register("whoami", Arc::new(WhoAmIHandler));

    dispatcher
}
