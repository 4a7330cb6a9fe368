/// Slash command detection: identify /commands in inbound messages.
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Detect a slash command at the start of a message string.
///
/// Telegram group syntax (`/help@TelefaxBot`) is accepted. Returns `None` for
/// normal text and for aliases that are not registered.
pub fn detect_command(text: &str, registry: &CommandRegistry) -> Option<CommandInvocation> {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (alias_part, rest) = split_alias(trimmed);
    let def = registry.find_by_alias(alias_part)?;

    Some(CommandInvocation {
        key: def.key.clone(),
        raw_alias: alias_part.to_string(),
        args: rest.split_whitespace().map(str::to_string).collect(),
        raw_args: rest.to_string(),
    })
}

/// Split `/cmd@bot rest` into (`/cmd`, `rest`).
pub(crate) fn split_alias(trimmed: &str) -> (&str, &str) {
    let (alias_part, rest) = trimmed
        .split_once(|c: char| c.is_whitespace())
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((trimmed, ""));
    let alias_part = alias_part.split_once('@').map(|(a, _)| a).unwrap_or(alias_part);
    (alias_part, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_command_with_args() {
        let registry = CommandRegistry::new();
        let inv = detect_command("  /setmaxcopies  10 ", &registry).unwrap();
        assert_eq!(inv.key, "setmaxcopies");
        assert_eq!(inv.args, vec!["10"]);
        assert_eq!(inv.raw_args, "10");
    }

    #[test]
    fn strips_bot_mention() {
        let registry = CommandRegistry::new();
        let inv = detect_command("/help@TelefaxBot", &registry).unwrap();
        assert_eq!(inv.key, "help");
        assert_eq!(inv.raw_alias, "/help");
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        let registry = CommandRegistry::new();
        assert!(detect_command("3 copies", &registry).is_none());
        assert!(detect_command("/print now", &registry).is_none());
    }
}
