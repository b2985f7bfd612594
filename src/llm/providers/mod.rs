//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openai_compatible;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `OPENAI_API_KEY` env (never TOML). The dummy
/// provider ignores it; the openai provider requires it.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider::echo())),
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let key = api_key.ok_or_else(|| {
                ProviderError::Request(
                    "OPENAI_API_KEY not set — required for the openai provider".into(),
                )
            })?;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LlmConfig, OpenAiConfig};

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            openai: OpenAiConfig {
                api_base_url: "http://localhost:0/v1/chat/completions".into(),
                model: "test-model".into(),
                temperature: 0.0,
                timeout_seconds: 1,
            },
        }
    }

    #[test]
    fn builds_dummy_without_key() {
        assert!(build(&llm_config("dummy"), None).is_ok());
    }

    #[test]
    fn openai_requires_key() {
        let err = build(&llm_config("openai"), None).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn openai_builds_with_key() {
        assert!(build(&llm_config("openai"), Some("sk-test".into())).is_ok());
    }

    #[test]
    fn unknown_provider_errors() {
        let err = build(&llm_config("mystery"), None).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(_)));
    }
}
