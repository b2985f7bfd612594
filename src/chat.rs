//! Chat dispatch — validate, resolve the business, build the exchange,
//! call the provider.
//!
//! Pure application logic: no HTTP types here. The server boundary maps
//! each [`ChatError`] kind to its status code.

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{CompletionRequest, LlmProvider};
use crate::store::BusinessStore;

/// Tenant used when a request carries no `business_id` — the original
/// deployment's demo tenant, kept for embed-widget convenience.
pub const DEFAULT_BUSINESS_ID: &str = "wills-waste";

/// Longest accepted user message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

const OVERSIZE_MESSAGE: &str =
    "Error: Your message is too long. Please keep it under 500 characters.";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Client-side problem with the request itself; never forwarded upstream.
    #[error("{0}")]
    Validation(String),
    /// Unknown business identifier.
    #[error("unknown business: {0}")]
    NotFound(String),
    /// Completion API failed — transport, auth, quota or malformed response.
    #[error("upstream completion failed: {0}")]
    Upstream(String),
}

/// One inbound chat call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub business_id: Option<String>,
}

/// Validate the message, look up the business, and run one completion
/// round-trip with that business's system prompt and token budget.
pub async fn handle_chat(
    store: &BusinessStore,
    provider: &LlmProvider,
    request: &ChatRequest,
) -> Result<String, ChatError> {
    let message = request.message.trim();
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::Validation(OVERSIZE_MESSAGE.to_string()));
    }

    let business_id = request
        .business_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BUSINESS_ID);

    let config = store
        .get(business_id)
        .ok_or_else(|| ChatError::NotFound(business_id.to_string()))?;

    debug!(business_id = %config.business_id, max_tokens = config.max_tokens, "dispatching chat");

    let reply = provider
        .complete(CompletionRequest {
            system: &config.system_prompt,
            user: message,
            max_tokens: config.max_tokens,
        })
        .await
        .map_err(|e| {
            warn!(business_id = %config.business_id, error = %e, "completion call failed");
            ChatError::Upstream(e.to_string())
        })?;

    Ok(reply.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::dummy::DummyProvider;
    use crate::store::{BusinessConfig, FallbackContact};

    fn store_with(ids: &[&str]) -> BusinessStore {
        BusinessStore::from_configs(ids.iter().map(|id| BusinessConfig {
            business_id: id.to_string(),
            business_name: id.to_string(),
            system_prompt: format!("You are the assistant for {id}."),
            fallback_contact: FallbackContact::default(),
            max_tokens: 100,
        }))
    }

    fn req(message: &str, business_id: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            business_id: business_id.map(ToString::to_string),
        }
    }

    #[tokio::test]
    async fn oversized_message_rejected_before_provider() {
        let store = store_with(&["marios-italian"]);
        let dummy = DummyProvider::echo();
        let provider = LlmProvider::Dummy(dummy.clone());

        let long = "x".repeat(501);
        let err = handle_chat(&store, &provider, &req(&long, Some("marios-italian")))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert!(err.to_string().contains("too long"));
        assert_eq!(dummy.call_count(), 0);
    }

    #[tokio::test]
    async fn exactly_500_chars_is_accepted() {
        let store = store_with(&["marios-italian"]);
        let provider = LlmProvider::Dummy(DummyProvider::echo());

        let msg = "y".repeat(500);
        let reply = handle_chat(&store, &provider, &req(&msg, Some("marios-italian")))
            .await
            .unwrap();
        assert!(reply.ends_with(&msg));
    }

    #[tokio::test]
    async fn unknown_business_rejected_before_provider() {
        let store = store_with(&["marios-italian"]);
        let dummy = DummyProvider::echo();
        let provider = LlmProvider::Dummy(dummy.clone());

        let err = handle_chat(&store, &provider, &req("hi", Some("nobody")))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound(_)));
        assert_eq!(dummy.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_business_id_falls_back_to_default() {
        let store = store_with(&[DEFAULT_BUSINESS_ID]);
        let provider = LlmProvider::Dummy(DummyProvider::echo());

        let reply = handle_chat(&store, &provider, &req("hi", None)).await.unwrap();
        assert_eq!(reply, "[echo] hi");
    }

    #[tokio::test]
    async fn blank_business_id_falls_back_to_default() {
        let store = store_with(&[DEFAULT_BUSINESS_ID]);
        let provider = LlmProvider::Dummy(DummyProvider::echo());

        let reply = handle_chat(&store, &provider, &req("hi", Some("  ")))
            .await
            .unwrap();
        assert_eq!(reply, "[echo] hi");
    }

    #[tokio::test]
    async fn provider_receives_stored_prompt_and_budget() {
        let store = BusinessStore::from_configs([BusinessConfig {
            business_id: "marios-italian".into(),
            business_name: "Mario's".into(),
            system_prompt: "You are the virtual assistant for Mario's.".into(),
            fallback_contact: FallbackContact::default(),
            max_tokens: 150,
        }]);
        let dummy = DummyProvider::echo();
        let provider = LlmProvider::Dummy(dummy.clone());

        handle_chat(&store, &provider, &req("hi", Some("marios-italian")))
            .await
            .unwrap();

        let call = dummy.last_call().unwrap();
        assert_eq!(call.system, "You are the virtual assistant for Mario's.");
        assert_eq!(call.max_tokens, 150);
        assert_eq!(call.user, "hi");
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let store = store_with(&["marios-italian"]);
        let provider = LlmProvider::Dummy(DummyProvider::with_reply("  Hello!  \n"));

        let reply = handle_chat(&store, &provider, &req("hi", Some("marios-italian")))
            .await
            .unwrap();
        assert_eq!(reply, "Hello!");
    }
}
