//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory (or
//! the path given with `-f`), then applies `TEXTGEN_API_ENDPOINT` and
//! `TEXTGEN_LOG_LEVEL` env overrides.
//!
//! `generation_settings` is kept as an untyped JSON map: values are forwarded
//! to the backend verbatim and a missing key only surfaces when a request is
//! built.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppError;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// PTY (console) channel configuration.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    pub enabled: bool,
}

/// Telegram channel configuration. The bot token is read from
/// `TELEGRAM_BOT_TOKEN`, never from TOML.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub enabled: bool,
}

/// Comms subsystem configuration.
#[derive(Debug, Clone)]
pub struct CommsConfig {
    pub pty: PtyConfig,
    pub telegram: TelegramConfig,
}

/// How inbound text is recognised as the chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConfig {
    /// Leading marker, e.g. `"!"`.
    pub prefix: String,
    /// Command word following the prefix, e.g. `"gpt"`.
    pub name: String,
}

/// Backend connection and generation parameters.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// `host:port` of the generation backend, without scheme.
    pub api_endpoint: String,
    /// Which request/response contract to speak (`"chat_completions"`,
    /// `"legacy_chat"` or `"dummy"`).
    pub api_mode: String,
    /// Optional whole-request timeout. `None` leaves it to the transport.
    pub timeout_seconds: Option<u64>,
    /// Raw `[generation_settings]` table, forwarded verbatim.
    pub generation_settings: Map<String, Value>,
}

/// Fully-resolved bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_name: String,
    pub log_level: String,
    /// Optional log file; logs go to stderr when unset.
    pub log_file: Option<PathBuf>,
    pub command: CommandConfig,
    pub backend: BackendConfig,
    pub comms: CommsConfig,
}

impl Config {
    /// Returns `true` if the PTY channel should be loaded.
    pub fn comms_pty_should_load(&self) -> bool {
        self.comms.pty.enabled
    }

    /// Returns `true` if the Telegram channel should be loaded.
    pub fn comms_telegram_should_load(&self) -> bool {
        self.comms.telegram.enabled
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    bot: RawBot,
    api_endpoint: String,
    #[serde(default = "default_api_mode")]
    api_mode: String,
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    generation_settings: Map<String, Value>,
    #[serde(default)]
    comms: RawComms,
}

#[derive(Deserialize)]
struct RawBot {
    #[serde(default = "default_bot_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default = "default_command_prefix")]
    command_prefix: String,
    #[serde(default = "default_command_name")]
    command_name: String,
}

impl Default for RawBot {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            log_file: None,
            command_prefix: default_command_prefix(),
            command_name: default_command_name(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawComms {
    #[serde(default)]
    pty: RawPty,
    #[serde(default)]
    telegram: RawTelegram,
}

#[derive(Deserialize)]
struct RawPty {
    /// Defaults to `true`; still requires `-i` at runtime.
    #[serde(default = "default_true")]
    enabled: bool,
}

impl Default for RawPty {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Deserialize, Default)]
struct RawTelegram {
    /// Defaults to `false`: Telegram must be explicitly enabled.
    #[serde(default)]
    enabled: bool,
}

fn default_bot_name() -> String { "textgen".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_command_prefix() -> String { "!".to_string() }
fn default_command_name() -> String { "gpt".to_string() }
fn default_api_mode() -> String { "chat_completions".to_string() }
fn default_true() -> bool { true }

/// Load config from `path` (or `config/default.toml`), then apply env-var
/// overrides.
pub fn load(path: Option<&str>) -> Result<Config, AppError> {
    let endpoint_override = env::var("TEXTGEN_API_ENDPOINT").ok();
    let log_level_override = env::var("TEXTGEN_LOG_LEVEL").ok();
    load_from(
        Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH)),
        endpoint_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    endpoint_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
    parse(&raw, endpoint_override, log_level_override)
        .map_err(|e| AppError::Config(format!("{} in {}", e, path.display())))
}

fn parse(
    raw: &str,
    endpoint_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, String> {
    let parsed: RawConfig = toml::from_str(raw).map_err(|e| format!("parse error: {e}"))?;

    let api_endpoint = endpoint_override.unwrap_or(&parsed.api_endpoint).trim().to_string();
    if api_endpoint.is_empty() {
        return Err("api_endpoint must not be empty".to_string());
    }
    if api_endpoint.contains("://") {
        return Err(format!("api_endpoint must be host:port without a scheme, got '{api_endpoint}'"));
    }

    let bot = parsed.bot;
    if bot.command_name.trim().is_empty() {
        return Err("bot.command_name must not be empty".to_string());
    }

    Ok(Config {
        bot_name: bot.name,
        log_level: log_level_override.unwrap_or(&bot.log_level).to_string(),
        log_file: bot.log_file.map(PathBuf::from),
        command: CommandConfig {
            prefix: bot.command_prefix,
            name: bot.command_name,
        },
        backend: BackendConfig {
            api_endpoint,
            api_mode: parsed.api_mode,
            timeout_seconds: parsed.timeout_seconds,
            generation_settings: parsed.generation_settings,
        },
        comms: CommsConfig {
            pty: PtyConfig { enabled: parsed.comms.pty.enabled },
            telegram: TelegramConfig { enabled: parsed.comms.telegram.enabled },
        },
    })
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for tests — dummy backend, no channels, no external calls.
impl Config {
    #[doc(hidden)]
    pub fn test_default() -> Self {
        Self {
            bot_name: "test".into(),
            log_level: "info".into(),
            log_file: None,
            command: CommandConfig { prefix: "!".into(), name: "gpt".into() },
            backend: BackendConfig {
                api_endpoint: "127.0.0.1:0".into(),
                api_mode: "dummy".into(),
                timeout_seconds: Some(1),
                generation_settings: Map::new(),
            },
            comms: CommsConfig {
                pty: PtyConfig { enabled: false },
                telegram: TelegramConfig { enabled: false },
            },
        }
    }
}
