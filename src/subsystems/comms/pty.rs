//! PTY (console) channel — reads lines from stdin, passes them to the bot,
//! prints the reply to stdout.
//!
//! Only loaded in interactive runs (`-i`). Runs until the `shutdown` token is
//! cancelled (Ctrl-C) or stdin is closed.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{CommsState, INTERNAL_ERROR_REPLY};
use crate::error::AppError;
use crate::subsystems::runtime::{Component, ComponentFuture};

pub struct PtyChannel {
    channel_id: String,
    state: Arc<CommsState>,
}

impl PtyChannel {
    pub fn new(channel_id: impl Into<String>, state: Arc<CommsState>) -> Self {
        Self { channel_id: channel_id.into(), state }
    }
}

impl Component for PtyChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_pty(self.channel_id, self.state, shutdown))
    }
}

async fn run_pty(
    channel_id: String,
    state: Arc<CommsState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!(%channel_id, "pty channel started");
    println!("─────────────────────────────────");
    println!(" textgen console  (Ctrl-C to quit)");
    println!(" try: !gpt <message>   or   !help");
    println!("─────────────────────────────────");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        use std::io::Write as _;
        let _ = std::io::stdout().flush();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!(%channel_id, "shutdown signal received — closing console channel");
                break;
            }

            line = lines.next_line() => {
                match line {
                    Err(e) => {
                        warn!("pty read error: {e}");
                        break;
                    }
                    Ok(None) => {
                        info!("pty stdin closed");
                        break;
                    }
                    Ok(Some(input)) => {
                        if input.trim().is_empty() { continue; }
                        debug!(input = %input, "pty received line");

                        match state.send_message(&channel_id, &input).await {
                            Ok(Some(reply)) => println!("{reply}"),
                            Ok(None) => debug!("pty line is not a command"),
                            Err(e) => {
                                warn!("send_message error: {e}");
                                println!("{INTERNAL_ERROR_REPLY}");
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
