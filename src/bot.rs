//! The chat command handler.
//!
//! `TextGenBot` owns the conversation history and the backend. Channels hand
//! it raw inbound text; it answers with the reply to send, if any.
//!
//! History is one buffer shared by every channel and user. The lock is held
//! for append + snapshot only, never across the backend call, so concurrent
//! commands cannot corrupt the buffer (they may interleave their turns).

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::command::{self, Command};
use crate::config::{CommandConfig, Config};
use crate::history::HistoryBuffer;
use crate::llm::{providers, AdapterError, Backend, ProviderError};

/// Reply to the command with no text after it.
pub const NO_INPUT_REPLY: &str = "You didn't provide any input for the chatbot.";

pub struct TextGenBot {
    history: Mutex<HistoryBuffer>,
    backend: Backend,
    command: CommandConfig,
}

impl TextGenBot {
    pub fn new(backend: Backend, command: CommandConfig) -> Self {
        Self { history: Mutex::new(HistoryBuffer::new()), backend, command }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let backend = providers::build(&config.backend)?;
        info!(backend = backend.name(), endpoint = %config.backend.api_endpoint, "backend ready");
        Ok(Self::new(backend, config.command.clone()))
    }

    /// Handle one inbound message. `Ok(None)` means the text was not a command.
    pub async fn handle_text(&self, text: &str) -> Result<Option<String>, AdapterError> {
        match command::parse(&self.command, text) {
            None => Ok(None),
            Some(Command::Help) => Ok(Some(command::usage(&self.command))),
            Some(Command::Chat(argument)) => self.chat(argument).await.map(Some),
        }
    }

    /// The `gpt` command: record the message, query the backend, and render
    /// the outcome. Only a missing generation setting is returned as `Err`.
    pub async fn chat(&self, argument: Option<&str>) -> Result<String, AdapterError> {
        let Some(message) = argument.filter(|m| !m.trim().is_empty()) else {
            debug!("chat command without input");
            return Ok(NO_INPUT_REPLY.to_string());
        };

        let history = {
            let mut buffer = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            buffer.append(message);
            buffer.snapshot()
        };
        debug!(history_len = history.len(), backend = self.backend.name(), "chat command");

        let outcome = self.backend.complete(&history, message).await?;
        Ok(outcome.into_display())
    }

    /// Oldest → newest copy of the shared history.
    pub fn history_snapshot(&self) -> Vec<String> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).snapshot()
    }
}
