//! Dummy backend — echoes input back prefixed with `[echo]`.
//! Lets the console channel run end to end without a generation server.

use crate::llm::CompletionOutcome;

#[derive(Debug, Clone)]
pub struct DummyBackend;

impl DummyBackend {
    pub fn complete(&self, message: &str) -> CompletionOutcome {
        CompletionOutcome::Reply(format!("[echo] {message}"))
    }
}
