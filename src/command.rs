//! Inbound command recognition.
//!
//! A message addresses the bot when it starts with `{prefix}{name}` followed
//! by whitespace or the end of the text. Everything after the command word is
//! passed on raw as the argument, with only leading whitespace removed.

use crate::config::CommandConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `!gpt <text>`. `None` when no text followed the command.
    Chat(Option<&'a str>),
    /// `!help`.
    Help,
}

/// Returns `None` for messages that are not meant for the bot.
pub fn parse<'a>(config: &CommandConfig, text: &'a str) -> Option<Command<'a>> {
    let rest = text.trim_start().strip_prefix(config.prefix.as_str())?;

    if let Some(argument) = strip_word(rest, &config.name) {
        let argument = argument.trim_start();
        return Some(Command::Chat((!argument.is_empty()).then_some(argument)));
    }
    if strip_word(rest, "help").is_some() {
        return Some(Command::Help);
    }
    None
}

pub fn usage(config: &CommandConfig) -> String {
    format!("Usage: {}{} <message> — Interact with the chatbot.", config.prefix, config.name)
}

/// Strip `word` from the front of `text` if it is a whole word.
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CommandConfig {
        CommandConfig { prefix: "!".into(), name: "gpt".into() }
    }

    #[test]
    fn command_with_argument() {
        assert_eq!(parse(&cfg(), "!gpt hello there"), Some(Command::Chat(Some("hello there"))));
    }

    #[test]
    fn argument_keeps_inner_lines() {
        assert_eq!(
            parse(&cfg(), "!gpt line one\nline two\n"),
            Some(Command::Chat(Some("line one\nline two\n")))
        );
    }

    #[test]
    fn argument_keeps_trailing_whitespace() {
        assert_eq!(parse(&cfg(), "!gpt hello   "), Some(Command::Chat(Some("hello   "))));
        assert_eq!(parse(&cfg(), "!gpt \t hello"), Some(Command::Chat(Some("hello"))));
    }

    #[test]
    fn bare_or_blank_command_has_no_argument() {
        assert_eq!(parse(&cfg(), "!gpt"), Some(Command::Chat(None)));
        assert_eq!(parse(&cfg(), "  !gpt   \t "), Some(Command::Chat(None)));
    }

    #[test]
    fn other_text_is_ignored() {
        assert_eq!(parse(&cfg(), "hello"), None);
        assert_eq!(parse(&cfg(), "gpt hello"), None);
        assert_eq!(parse(&cfg(), "!gpthello"), None);
        assert_eq!(parse(&cfg(), "!other hi"), None);
        assert_eq!(parse(&cfg(), ""), None);
    }

    #[test]
    fn help_command() {
        assert_eq!(parse(&cfg(), "!help"), Some(Command::Help));
        assert!(usage(&cfg()).starts_with("Usage: !gpt <message>"));
    }

    #[test]
    fn custom_prefix_and_name() {
        let c = CommandConfig { prefix: "/".into(), name: "ask".into() };
        assert_eq!(parse(&c, "/ask why?"), Some(Command::Chat(Some("why?"))));
        assert_eq!(parse(&c, "!gpt why?"), None);
    }
}
