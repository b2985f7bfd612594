//! Dummy LLM provider — echoes input back prefixed with `[echo]`, or returns
//! a canned reply. Used for offline runs and for exercising the full request
//! path without a real API key. Counts calls so tests can assert that the
//! completion API was never reached.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::llm::{CompletionRequest, ProviderError};

/// Snapshot of the last exchange a [`DummyProvider`] received.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct DummyProvider {
    canned_reply: Option<String>,
    calls: Arc<AtomicUsize>,
    last_call: Arc<Mutex<Option<CapturedCall>>>,
}

impl DummyProvider {
    /// Echo mode — replies with `[echo] <message>`.
    pub fn echo() -> Self {
        Self::build(None)
    }

    /// Fixed-reply mode — always answers with `reply`, whatever the input.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::build(Some(reply.into()))
    }

    fn build(canned_reply: Option<String>) -> Self {
        Self {
            canned_reply,
            calls: Arc::new(AtomicUsize::new(0)),
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Number of `complete` calls made against this instance (and its clones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent exchange, if any call was made.
    pub fn last_call(&self) -> Option<CapturedCall> {
        self.last_call.lock().unwrap().clone()
    }

    pub async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some(CapturedCall {
            system: request.system.to_string(),
            user: request.user.to_string(),
            max_tokens: request.max_tokens,
        });
        match &self.canned_reply {
            Some(reply) => Ok(reply.clone()),
            None => Ok(format!("[echo] {}", request.user)),
        }
    }
}
