//! Backend implementations.
//!
//! `build(config)` is the factory, called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod chat_completions;
pub mod dummy;
pub mod legacy_chat;

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::BackendConfig;
use crate::llm::{AdapterError, Backend, ProviderError};

/// Construct a `Backend` from the `api_mode` named in config.
pub fn build(config: &BackendConfig) -> Result<Backend, ProviderError> {
    let timeout = config.timeout_seconds.map(Duration::from_secs);
    match config.api_mode.as_str() {
        "chat_completions" | "openai" => Ok(Backend::ChatCompletions(
            chat_completions::ChatCompletionsBackend::new(
                &config.api_endpoint,
                timeout,
                config.generation_settings.clone(),
            ),
        )),
        "legacy_chat" | "legacy" => Ok(Backend::LegacyChat(legacy_chat::LegacyChatBackend::new(
            &config.api_endpoint,
            timeout,
            config.generation_settings.clone(),
        ))),
        "dummy" => Ok(Backend::Dummy(dummy::DummyBackend)),
        other => Err(ProviderError::UnknownBackend(other.to_string())),
    }
}

/// Fetch a generation setting verbatim. No defaulting: absence is an error.
pub(crate) fn setting(settings: &Map<String, Value>, key: &str) -> Result<Value, AdapterError> {
    settings
        .get(key)
        .cloned()
        .ok_or_else(|| AdapterError::MissingSetting(key.to_string()))
}

/// `http://{host:port}{path}` — the endpoint is configured without a scheme.
pub(crate) fn endpoint_url(api_endpoint: &str, path: &str) -> String {
    format!("http://{}{}", api_endpoint.trim_end_matches('/'), path)
}
