/// Slash command types.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Arg
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandArg {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Number,
}

// ---------------------------------------------------------------------------
// Command definition
// ---------------------------------------------------------------------------

/// A fully-defined slash command entry in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDef {
    /// Unique key (e.g. "help", "setmaxcopies").
    pub key: String,
    pub description: String,
    /// Slash aliases (must start with '/').
    pub text_aliases: Vec<String>,
    pub args: Vec<CommandArg>,
    /// Hidden from `/help` for senders who cannot run it.
    pub admin_only: bool,
}

impl CommandDef {
    /// Primary alias (first in list), or key if none.
    pub fn primary_alias(&self) -> &str {
        self.text_aliases.first().map(|s| s.as_str()).unwrap_or(&self.key)
    }

    /// `/setmaxcopies <number>`
    pub fn usage(&self) -> String {
        let mut usage = self.primary_alias().to_string();
        for arg in &self.args {
            usage.push_str(&format!(" <{}>", arg.name));
        }
        usage
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A detected and parsed slash-command invocation.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub key: String,
    pub raw_alias: String,
    /// Whitespace-separated arguments.
    pub args: Vec<String>,
    /// Full remaining text after the command name.
    pub raw_args: String,
}
