//! Checks on the shipped config/default.toml.

use std::path::Path;

use textgen_bot::config;
use textgen_bot::llm::providers::{self, chat_completions, legacy_chat};

const DEFAULT_CONFIG: &str = "config/default.toml";

#[test]
fn default_config_loads() {
    let cfg = config::load_from(Path::new(DEFAULT_CONFIG), None, None).unwrap();
    assert_eq!(cfg.command.prefix, "!");
    assert_eq!(cfg.command.name, "gpt");
    assert!(!cfg.backend.api_endpoint.contains("://"));
    assert!(!cfg.comms_telegram_should_load());
}

#[test]
fn default_config_builds_a_backend() {
    let cfg = config::load_from(Path::new(DEFAULT_CONFIG), None, None).unwrap();
    let backend = providers::build(&cfg.backend).unwrap();
    assert_eq!(backend.name(), "chat_completions");
}

#[test]
fn default_generation_settings_are_complete() {
    let cfg = config::load_from(Path::new(DEFAULT_CONFIG), None, None).unwrap();
    let settings = &cfg.backend.generation_settings;
    assert!(chat_completions::build_request(&[], "x", settings).is_ok());
    assert!(legacy_chat::build_request("x", settings).is_ok());
}
