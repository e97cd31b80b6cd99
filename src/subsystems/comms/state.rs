//! Shared state for the comms subsystem — the channels' only way in.
//!
//! Channels receive an `Arc<CommsState>` and talk to the bot through
//! [`CommsState::send_message`]; they never touch the history or backend.

use std::sync::Arc;

use tracing::error;

use crate::bot::TextGenBot;
use crate::error::AppError;

/// Notice sent when the bot fails in a way the user cannot fix.
pub const INTERNAL_ERROR_REPLY: &str = "Internal error processing message.";

pub struct CommsState {
    bot: Arc<TextGenBot>,
}

impl CommsState {
    pub fn new(bot: Arc<TextGenBot>) -> Self {
        Self { bot }
    }

    /// Pass `content` from `channel_id` to the bot and return the reply.
    ///
    /// `Ok(None)` means the message was not addressed to the bot. Request
    /// construction failures come back as `AppError::Comms` for the channel
    /// to log and report.
    pub async fn send_message(
        &self,
        channel_id: &str,
        content: &str,
    ) -> Result<Option<String>, AppError> {
        self.bot.handle_text(content).await.map_err(|e| {
            error!(%channel_id, error = %e, "command failed");
            AppError::Comms(format!("command failed: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::providers;

    fn state(api_mode: &str) -> CommsState {
        let mut cfg = Config::test_default();
        cfg.backend.api_mode = api_mode.into();
        CommsState::new(Arc::new(TextGenBot::from_config(&cfg).unwrap()))
    }

    #[tokio::test]
    async fn reply_passes_through() {
        let s = state("dummy");
        let reply = s.send_message("pty0", "!gpt yo").await.unwrap();
        assert_eq!(reply.as_deref(), Some("[echo] yo"));
    }

    #[tokio::test]
    async fn missing_setting_becomes_comms_error() {
        let s = state("legacy_chat");
        let err = s.send_message("pty0", "!gpt yo").await.unwrap_err();
        assert!(matches!(err, AppError::Comms(ref m) if m.contains("max_new_tokens")));
    }

    #[test]
    fn unknown_mode_rejected_at_build() {
        let mut cfg = Config::test_default();
        cfg.backend.api_mode = "nope".into();
        assert!(providers::build(&cfg.backend).is_err());
    }
}
