/// Slash command registry.
use crate::types::{ArgType, CommandArg, CommandDef};

fn number_arg(name: &str, description: &str) -> CommandArg {
    CommandArg {
        name: name.to_string(),
        description: description.to_string(),
        arg_type: ArgType::Number,
        required: true,
    }
}

/// Build the built-in command registry.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        CommandDef {
            key: "start".into(),
            description: "Display the welcome message.".into(),
            text_aliases: vec!["/start".into()],
            args: vec![],
            admin_only: false,
        },
        CommandDef {
            key: "help".into(),
            description: "Show this help message.".into(),
            text_aliases: vec!["/help".into()],
            args: vec![],
            admin_only: false,
        },
        CommandDef {
            key: "setmaxcopies".into(),
            description: "Set the max copies allowed per print (e.g. /setmaxcopies 50).".into(),
            text_aliases: vec!["/setmaxcopies".into()],
            args: vec![number_arg("number", "New copy ceiling")],
            admin_only: true,
        },
        CommandDef {
            key: "whoami".into(),
            description: "Show your sender id.".into(),
            text_aliases: vec!["/whoami".into(), "/id".into()],
            args: vec![],
            admin_only: false,
        },
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    /// Find a command by slash-text alias (e.g. "/help").
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        let lower = alias.to_lowercase();
        self.commands.iter().find(|c| {
            c.text_aliases.iter().any(|a| a.to_lowercase() == lower)
        })
    }

    /// Find a command by its key.
    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_alias_case_insensitively() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.find_by_alias("/SetMaxCopies").unwrap().key, "setmaxcopies");
        assert_eq!(registry.find_by_alias("/id").unwrap().key, "whoami");
        assert!(registry.find_by_alias("/print").is_none());
    }

    #[test]
    fn usage_lists_arguments() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.find_by_key("setmaxcopies").unwrap().usage(),
            "/setmaxcopies <number>"
        );
    }

    #[test]
    fn setmaxcopies_takes_one_required_number() {
        let registry = CommandRegistry::new();
        let args = &registry.find_by_key("setmaxcopies").unwrap().args;
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].arg_type, ArgType::Number);
        assert!(args[0].required);
    }
}
