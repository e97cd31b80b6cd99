//! Telegram channel — receives messages via the Telegram Bot API, passes them
//! to the bot, and replies in the same chat.

use std::env;
use std::sync::Arc;

use teloxide::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{CommsState, INTERNAL_ERROR_REPLY};
use crate::error::AppError;
use crate::llm::NO_RESPONSE_REPLY;
use crate::subsystems::runtime::{Component, ComponentFuture};

/// Telegram caps messages at 4096 characters; chunk below that.
const MAX_MESSAGE_LENGTH: usize = 4000;

pub struct TelegramChannel {
    channel_id: String,
    state: Arc<CommsState>,
}

impl TelegramChannel {
    pub fn new(channel_id: impl Into<String>, state: Arc<CommsState>) -> Self {
        Self { channel_id: channel_id.into(), state }
    }
}

impl Component for TelegramChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_telegram(self.channel_id, self.state, shutdown))
    }
}

/// Split `text` into pieces of at most `max` characters.
///
/// Telegram rejects blank messages, so a blank reply becomes the
/// no-response text.
pub(crate) fn chunk_reply(text: &str, max: usize) -> Vec<String> {
    let text = if text.trim().is_empty() { NO_RESPONSE_REPLY } else { text };
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(max.max(1)).map(|c| c.iter().collect()).collect()
}

async fn run_telegram(
    channel_id: String,
    state: Arc<CommsState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let token = match env::var("TELEGRAM_BOT_TOKEN") {
        Ok(t) => t,
        Err(_) => {
            warn!(%channel_id, "TELEGRAM_BOT_TOKEN not set, telegram channel exiting");
            return Ok(());
        }
    };

    info!(%channel_id, "telegram channel starting");

    let bot = Bot::new(token);
    let handler_channel_id = channel_id.clone();

    let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
        let state = state.clone();
        let channel_id = handler_channel_id.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };
            debug!(
                %channel_id,
                from = ?msg.from.as_ref().and_then(|u| u.username.as_ref()),
                "telegram received message"
            );

            match state.send_message(&channel_id, text).await {
                Ok(Some(reply)) => {
                    for chunk in chunk_reply(&reply, MAX_MESSAGE_LENGTH) {
                        if let Err(e) = bot.send_message(msg.chat.id, chunk).await {
                            warn!("failed to send telegram reply: {e}");
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("send_message error: {e}");
                    if let Err(e) = bot.send_message(msg.chat.id, INTERNAL_ERROR_REPLY).await {
                        warn!("failed to send telegram error notice: {e}");
                    }
                }
            }
            respond(())
        }
    });

    let mut dispatcher = Dispatcher::builder(bot, handler).build();

    tokio::select! {
        biased;

        _ = shutdown.cancelled() => {
            info!(%channel_id, "shutdown signal received — closing telegram channel");
        }
        _ = dispatcher.dispatch() => {
            warn!(%channel_id, "telegram dispatcher exited unexpectedly");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reply_is_one_chunk() {
        assert_eq!(chunk_reply("hello", MAX_MESSAGE_LENGTH), vec!["hello"]);
    }

    #[test]
    fn long_reply_splits_on_char_boundaries() {
        let text = "é".repeat(9);
        let chunks = chunk_reply(&text, 4);
        assert_eq!(chunks, vec!["éééé", "éééé", "é"]);
    }

    #[test]
    fn blank_reply_still_sends_something() {
        assert_eq!(chunk_reply("", MAX_MESSAGE_LENGTH), vec![NO_RESPONSE_REPLY]);
        assert_eq!(chunk_reply(" \n", MAX_MESSAGE_LENGTH), vec![NO_RESPONSE_REPLY]);
    }
}
