//! Comms subsystem — the channels that deliver messages to the bot.
//!
//! Each channel (PTY, Telegram) implements [`Component`] and runs as its own
//! task via [`spawn_components`]. Channels capture a shared
//! [`Arc<CommsState>`] at construction time.

#[cfg(feature = "channel-pty")]
pub mod pty;
mod state;
#[cfg(feature = "channel-telegram")]
pub mod telegram;

pub use state::{CommsState, INTERNAL_ERROR_REPLY};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bot::TextGenBot;
use crate::config::Config;
use crate::subsystems::runtime::{spawn_components, Component, SubsystemHandle};

/// Spawn all configured channels and return their [`SubsystemHandle`].
///
/// Synchronous: returns as soon as the tasks are spawned.
pub fn start(config: &Config, bot: Arc<TextGenBot>, shutdown: CancellationToken) -> SubsystemHandle {
    let state = Arc::new(CommsState::new(bot));
    let mut components: Vec<Box<dyn Component>> = Vec::new();

    #[cfg(feature = "channel-pty")]
    {
        if config.comms_pty_should_load() {
            info!("loading pty channel");
            components.push(Box::new(pty::PtyChannel::new("pty0", state.clone())));
        }
    }

    #[cfg(feature = "channel-telegram")]
    {
        if config.comms_telegram_should_load() {
            info!("loading telegram channel");
            components.push(Box::new(telegram::TelegramChannel::new("telegram0", state.clone())));
        }
    }

    #[cfg(not(feature = "channel-telegram"))]
    {
        if config.comms_telegram_should_load() {
            tracing::warn!("telegram enabled in config but built without `channel-telegram`");
        }
    }

    spawn_components(components, shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_channels_configured() {
        let config = Config::test_default();
        let bot = Arc::new(TextGenBot::from_config(&config).unwrap());
        let handle = start(&config, bot, CancellationToken::new());
        assert_eq!(handle.component_count(), 0);
        assert!(handle.join().await.is_ok());
    }
}
