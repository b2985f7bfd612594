//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! when present (every field has a default, so a missing file is fine),
//! then applies `BIZCHAT_BIND`, `BIZCHAT_BUSINESSES_DIR` and
//! `BIZCHAT_LOG_LEVEL` env overrides. Secrets are never read from TOML:
//! `OPENAI_API_KEY` comes from the environment alone.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;

/// OpenAI / OpenAI-compatible provider configuration.
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM subsystem configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"` or `"openai"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    /// Config for the OpenAI / OpenAI-compatible provider (`[llm.openai]`).
    pub openai: OpenAiConfig,
}

/// Mail relay configuration. Credentials are read from env at send time,
/// never stored here.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP relay hostname (implicit TLS).
    pub relay: String,
    /// SMTPS port.
    pub port: u16,
    /// Fixed recipient for contact-form submissions.
    pub to_addr: String,
}

/// Fully-resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    pub bind: String,
    /// Root directory holding one subdirectory per business.
    pub businesses_dir: PathBuf,
    pub log_level: String,
    pub llm: LlmConfig,
    /// API key from `OPENAI_API_KEY` env var — `None` only makes sense with
    /// the dummy provider.
    pub llm_api_key: Option<String>,
    pub smtp: SmtpConfig,
}

// ── Raw TOML shape — serde target before resolution ───────────────────────────

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    smtp: RawSmtp,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_businesses_dir")]
    businesses_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            businesses_dir: default_businesses_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    openai: RawOpenAiConfig,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), openai: RawOpenAiConfig::default() }
    }
}

#[derive(Deserialize)]
struct RawOpenAiConfig {
    #[serde(default = "default_openai_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_openai_model")]
    model: String,
    #[serde(default = "default_openai_temperature")]
    temperature: f32,
    #[serde(default = "default_openai_timeout_seconds")]
    timeout_seconds: u64,
}

impl Default for RawOpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_openai_api_base_url(),
            model: default_openai_model(),
            temperature: default_openai_temperature(),
            timeout_seconds: default_openai_timeout_seconds(),
        }
    }
}

#[derive(Deserialize)]
struct RawSmtp {
    #[serde(default = "default_smtp_relay")]
    relay: String,
    #[serde(default = "default_smtp_port")]
    port: u16,
    #[serde(default = "default_smtp_to")]
    to_addr: String,
}

impl Default for RawSmtp {
    fn default() -> Self {
        Self {
            relay: default_smtp_relay(),
            port: default_smtp_port(),
            to_addr: default_smtp_to(),
        }
    }
}

fn default_bind() -> String { "0.0.0.0:10000".to_string() }
fn default_businesses_dir() -> String { "businesses".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_llm_provider() -> String { "openai".to_string() }
fn default_openai_api_base_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_openai_model() -> String { "gpt-4o".to_string() }
fn default_openai_temperature() -> f32 { 0.2 }
fn default_openai_timeout_seconds() -> u64 { 60 }
fn default_smtp_relay() -> String { "smtp.gmail.com".to_string() }
fn default_smtp_port() -> u16 { 465 }
fn default_smtp_to() -> String { "gavinscheu@gmail.com".to_string() }

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load config from `config/default.toml` (if present), then apply env-var
/// overrides.
pub fn load() -> Result<Config, AppError> {
    let bind_override = env::var("BIZCHAT_BIND").ok();
    let dir_override = env::var("BIZCHAT_BUSINESSES_DIR").ok();
    let log_level_override = env::var("BIZCHAT_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        bind_override.as_deref(),
        dir_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    // A missing file means all-defaults; an unreadable or malformed file
    // is a hard startup error.
    let parsed: RawConfig = if path.exists() {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?
    } else {
        RawConfig::default()
    };

    let bind = bind_override.unwrap_or(&parsed.server.bind).to_string();
    let businesses_dir =
        expand_home(dir_override.unwrap_or(&parsed.server.businesses_dir));
    let log_level = log_level_override
        .unwrap_or(&parsed.server.log_level)
        .to_string();

    Ok(Config {
        bind,
        businesses_dir,
        log_level,
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: env::var("OPENAI_API_KEY").ok(),
        smtp: SmtpConfig {
            relay: parsed.smtp.relay,
            port: parsed.smtp.port,
            to_addr: parsed.smtp.to_addr,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests — dummy LLM, no API keys, no external calls.
#[cfg(test)]
impl Config {
    pub fn test_default(businesses_dir: &Path) -> Self {
        Self {
            bind: "127.0.0.1:0".into(),
            businesses_dir: businesses_dir.to_path_buf(),
            log_level: "info".into(),
            llm: LlmConfig {
                provider: "dummy".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
            smtp: SmtpConfig {
                relay: "localhost".into(),
                port: 465,
                to_addr: "inbox@example.com".into(),
            },
        }
    }
}
