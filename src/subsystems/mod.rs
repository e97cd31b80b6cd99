//! Subsystem modules for the textgen bot.

pub mod comms;
pub mod runtime;
