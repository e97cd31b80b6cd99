// Library root — the binary entry point is src/main.rs; integration tests
// under tests/ drive the bot through this crate.

pub mod bot;
pub mod command;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod logger;
pub mod subsystems;
