//! Legacy text-generation chat backend (`POST /api/v1/chat`).
//!
//! This contract predates `/v1/chat/completions`: the server keeps its own
//! character/preset state, so the request carries only the new input, a fixed
//! set of chat options and an empty history object. The reply is the bot half
//! of the last visible history pair.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::{endpoint_url, setting};
use crate::llm::{transport, AdapterError, CompletionOutcome, NO_RESPONSE_REPLY};

pub const LEGACY_CHAT_PATH: &str = "/api/v1/chat";

const CHAT_INSTRUCT_COMMAND: &str = r#"Continue the chat dialogue below. Write a single reply for the character "<|character|>".\n\n<|prompt|>"#;

#[derive(Debug, Clone)]
pub struct LegacyChatBackend {
    url: String,
    timeout: Option<Duration>,
    settings: Map<String, Value>,
}

impl LegacyChatBackend {
    pub fn new(api_endpoint: &str, timeout: Option<Duration>, settings: Map<String, Value>) -> Self {
        Self { url: endpoint_url(api_endpoint, LEGACY_CHAT_PATH), timeout, settings }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `message` alone; the server keeps its own history.
    ///
    /// Non-200 and transport failures map like chat completions
    /// (`Error: Received status code N` / the generic failure text), not to
    /// the older "Sorry, I couldn't process your request." reply.
    pub async fn complete(&self, message: &str) -> Result<CompletionOutcome, AdapterError> {
        let request = build_request(message, &self.settings)?;
        debug!(url = %self.url, content_len = message.len(), "sending legacy chat request");
        Ok(match transport::post_json(&self.url, self.timeout, &request).await {
            Ok(body) => CompletionOutcome::Reply(extract_reply(&body)),
            Err(e) => e.into(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LegacyHistory {
    pub internal: Vec<[String; 2]>,
    pub visible: Vec<[String; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyChatRequest {
    pub user_input: String,
    pub max_new_tokens: Value,
    pub history: LegacyHistory,
    pub mode: &'static str,
    pub character: &'static str,
    pub instruction_template: &'static str,
    pub your_name: &'static str,
    pub regenerate: bool,
    #[serde(rename = "_continue")]
    pub continue_last: bool,
    pub stop_at_newline: bool,
    pub chat_generation_attempts: u32,
    #[serde(rename = "chat-instruct_command")]
    pub chat_instruct_command: &'static str,
    pub preset: &'static str,
    pub stopping_strings: Vec<String>,
}

pub fn build_request(
    message: &str,
    settings: &Map<String, Value>,
) -> Result<LegacyChatRequest, AdapterError> {
    Ok(LegacyChatRequest {
        user_input: message.to_string(),
        max_new_tokens: setting(settings, "max_new_tokens")?,
        history: LegacyHistory::default(),
        mode: "chat",
        character: "Example",
        instruction_template: "WizardLM",
        your_name: "AI:",
        regenerate: false,
        continue_last: false,
        stop_at_newline: false,
        chat_generation_attempts: 1,
        chat_instruct_command: CHAT_INSTRUCT_COMMAND,
        preset: "LLaMA-Precise",
        stopping_strings: Vec::new(),
    })
}

/// `results[0].history.visible[-1][1]`, or the no-response text.
pub fn extract_reply(body: &Value) -> String {
    body.pointer("/results/0/history/visible")
        .and_then(Value::as_array)
        .and_then(|visible| visible.last())
        .and_then(|pair| pair.get(1))
        .map(|reply| match reply {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("max_new_tokens".into(), json!(2000));
        m
    }

    #[test]
    fn request_has_legacy_shape() {
        let v = serde_json::to_value(build_request("hello", &settings()).unwrap()).unwrap();
        assert_eq!(v["user_input"], "hello");
        assert_eq!(v["max_new_tokens"], 2000);
        assert_eq!(v["history"], json!({"internal": [], "visible": []}));
        assert_eq!(v["mode"], "chat");
        assert_eq!(v["_continue"], false);
        assert_eq!(v["preset"], "LLaMA-Precise");
        assert!(v["chat-instruct_command"].as_str().unwrap().contains("<|character|>"));
        assert!(v["chat-instruct_command"].as_str().unwrap().contains(r"\n\n"));
    }

    #[test]
    fn request_requires_max_new_tokens() {
        let err = build_request("hello", &Map::new()).unwrap_err();
        assert_eq!(err, AdapterError::MissingSetting("max_new_tokens".into()));
    }

    #[test]
    fn extract_last_visible_reply() {
        let body = json!({
            "results": [{"history": {"internal": [], "visible": [
                ["first", "old reply"],
                ["hello", "Hi there!"]
            ]}}]
        });
        assert_eq!(extract_reply(&body), "Hi there!");
    }

    #[test]
    fn extract_missing_levels_is_no_response() {
        assert_eq!(extract_reply(&json!({})), NO_RESPONSE_REPLY);
        assert_eq!(extract_reply(&json!({"results": []})), NO_RESPONSE_REPLY);
        assert_eq!(
            extract_reply(&json!({"results": [{"history": {"visible": []}}]})),
            NO_RESPONSE_REPLY
        );
        assert_eq!(
            extract_reply(&json!({"results": [{"history": {"visible": [["only-user"]]}}]})),
            NO_RESPONSE_REPLY
        );
    }

    #[test]
    fn backend_url_targets_legacy_path() {
        let b = LegacyChatBackend::new("10.0.0.2:5000", None, Map::new());
        assert_eq!(b.url(), "http://10.0.0.2:5000/api/v1/chat");
    }
}
