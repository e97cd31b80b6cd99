//! OpenAI-style chat completion backend (`POST /v1/chat/completions`).
//!
//! Request: the history snapshot newest → oldest, tagged `user`/`bot` by
//! parity, then the new message once more as a final `user` turn, plus the
//! generation parameters copied verbatim from config.
//!
//! Response: `choices[0].message.content` followed by a fenced diagnostic
//! block. Every field lookup degrades to `N/A`; extraction never fails.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{endpoint_url, setting};
use crate::llm::{transport, AdapterError, CompletionOutcome, NO_RESPONSE_REPLY};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Placeholder for any diagnostic field the backend left out.
const NOT_AVAILABLE: &str = "N/A";

// ── Backend ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ChatCompletionsBackend {
    url: String,
    timeout: Option<Duration>,
    settings: Map<String, Value>,
}

impl ChatCompletionsBackend {
    pub fn new(api_endpoint: &str, timeout: Option<Duration>, settings: Map<String, Value>) -> Self {
        Self { url: endpoint_url(api_endpoint, COMPLETIONS_PATH), timeout, settings }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One round-trip. A missing setting fails before any network I/O.
    pub async fn complete(
        &self,
        history: &[String],
        message: &str,
    ) -> Result<CompletionOutcome, AdapterError> {
        let request = build_request(history, message, &self.settings)?;
        debug!(
            url = %self.url,
            turns = request.messages.len(),
            content_len = message.len(),
            "sending chat completion request"
        );
        Ok(match transport::post_json(&self.url, self.timeout, &request).await {
            Ok(body) => CompletionOutcome::Reply(extract_reply(&body)),
            Err(e) => e.into(),
        })
    }
}

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Sampling parameters, each forwarded exactly as configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_tokens: Value,
    pub max_new_tokens: Value,
    pub temperature: Value,
    pub top_p: Value,
    pub min_p: Value,
    pub top_k: Value,
    pub repetition_penalty: Value,
    pub presence_penalty: Value,
    pub frequency_penalty: Value,
    pub typical_p: Value,
    pub seed: Value,
}

impl GenerationParams {
    pub fn from_settings(settings: &Map<String, Value>) -> Result<Self, AdapterError> {
        Ok(Self {
            max_tokens: setting(settings, "max_tokens")?,
            max_new_tokens: setting(settings, "max_new_tokens")?,
            temperature: setting(settings, "temperature")?,
            top_p: setting(settings, "top_p")?,
            min_p: setting(settings, "min_p")?,
            top_k: setting(settings, "top_k")?,
            repetition_penalty: setting(settings, "repetition_penalty")?,
            presence_penalty: setting(settings, "presence_penalty")?,
            frequency_penalty: setting(settings, "frequency_penalty")?,
            typical_p: setting(settings, "typical_p")?,
            seed: setting(settings, "seed")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<Turn>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Build the request body. `history` is oldest → newest and, in the live
/// flow, already ends with `message`, so the new message is sent twice.
pub fn build_request(
    history: &[String],
    message: &str,
    settings: &Map<String, Value>,
) -> Result<ChatCompletionRequest, AdapterError> {
    let params = GenerationParams::from_settings(settings)?;

    let mut messages: Vec<Turn> = history
        .iter()
        .rev()
        .enumerate()
        .map(|(i, content)| Turn {
            role: if i % 2 == 0 { Role::User } else { Role::Bot },
            content: content.clone(),
        })
        .collect();
    messages.push(Turn { role: Role::User, content: message.to_string() });

    Ok(ChatCompletionRequest { messages, params })
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Turn a 200 response body into display text.
pub fn extract_reply(body: &Value) -> String {
    let Some(first) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
    else {
        return NO_RESPONSE_REPLY.to_string();
    };

    let content = render(first.pointer("/message/content"));
    let model = render(body.get("model"));
    let finish_reason = render(first.get("finish_reason"));
    let prompt_tokens = render(body.pointer("/usage/prompt_tokens"));
    let completion_tokens = render(body.pointer("/usage/completion_tokens"));
    let total_tokens = render(body.pointer("/usage/total_tokens"));

    format!(
        "{content}\n\n```\n\
         Model: {model}\n\
         Completion reason: {finish_reason}\n\
         Prompt tokens: {prompt_tokens}\n\
         Completion tokens: {completion_tokens}\n\
         Total tokens: {total_tokens}\n\
         ```"
    )
}

/// Strings as-is, other scalars as JSON text, absent or null as `N/A`.
fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
