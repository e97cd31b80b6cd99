//! Generation backend abstraction.
//!
//! `Backend` is an enum over the wire contracts the bot can speak. Each
//! variant owns its request construction and response extraction; the HTTP
//! exchange itself lives in [`transport`].
//!
//! A call produces a [`CompletionOutcome`] rather than an error for every
//! failure the user should see as text. Only a missing generation setting is
//! a real `Err`: that is a configuration defect and propagates to the channel.

pub mod providers;
pub mod transport;

use thiserror::Error;

/// Reply when the backend answered 200 but produced nothing usable.
pub const NO_RESPONSE_REPLY: &str = "No response from the AI.";
/// Reply when the request never produced a parseable response.
pub const TRANSPORT_FAILURE_REPLY: &str = "An error occurred while processing the request.";

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown api_mode: {0}")]
    UnknownBackend(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("generation setting '{0}' is missing from [generation_settings]")]
    MissingSetting(String),
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Result of one backend round-trip, as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Status 200 and a parsed body; text is already formatted for display.
    Reply(String),
    /// Backend answered with a status other than 200.
    HttpStatus(u16),
    /// Connection, timeout or body-decoding failure.
    Transport(String),
}

impl CompletionOutcome {
    /// Map the outcome to the text sent back to the conversation.
    pub fn into_display(self) -> String {
        match self {
            CompletionOutcome::Reply(text) => text,
            CompletionOutcome::HttpStatus(status) => {
                format!("Error: Received status code {status}")
            }
            CompletionOutcome::Transport(_) => TRANSPORT_FAILURE_REPLY.to_string(),
        }
    }
}

impl From<transport::TransportError> for CompletionOutcome {
    fn from(e: transport::TransportError) -> Self {
        match e {
            transport::TransportError::Status(status) => CompletionOutcome::HttpStatus(status),
            transport::TransportError::Failed(detail) => CompletionOutcome::Transport(detail),
        }
    }
}

// ── Backend enum ──────────────────────────────────────────────────────────────

/// All supported backends. Adding one = new module + new variant + new arm.
#[derive(Debug, Clone)]
pub enum Backend {
    ChatCompletions(providers::chat_completions::ChatCompletionsBackend),
    LegacyChat(providers::legacy_chat::LegacyChatBackend),
    Dummy(providers::dummy::DummyBackend),
}

impl Backend {
    /// Send `message` with the history snapshot (oldest → newest, already
    /// containing `message`) and return the user-facing outcome.
    pub async fn complete(
        &self,
        history: &[String],
        message: &str,
    ) -> Result<CompletionOutcome, AdapterError> {
        match self {
            Backend::ChatCompletions(b) => b.complete(history, message).await,
            Backend::LegacyChat(b) => b.complete(message).await,
            Backend::Dummy(b) => Ok(b.complete(message)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::ChatCompletions(_) => "chat_completions",
            Backend::LegacyChat(_) => "legacy_chat",
            Backend::Dummy(_) => "dummy",
        }
    }
}
