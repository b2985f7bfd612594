//! BizChat — server entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config, init logger at the configured level
//!   3. Load the business store snapshot
//!   4. Build the LLM provider and mailer
//!   5. Serve until Ctrl-C

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use bizchat::config;
use bizchat::contact::{Mailer, SmtpMailer};
use bizchat::error::AppError;
use bizchat::llm::providers;
use bizchat::logger;
use bizchat::server::{self, AppState};
use bizchat::store::BusinessStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level)?;

    info!(
        bind = %config.bind,
        businesses_dir = %config.businesses_dir.display(),
        provider = %config.llm.provider,
        "config loaded"
    );

    let store = Arc::new(BusinessStore::load(&config.businesses_dir));
    if store.is_empty() {
        warn!("no business configs loaded — every chat lookup will miss");
    }

    let provider = providers::build(&config.llm, config.llm_api_key.clone())
        .map_err(|e| AppError::Config(e.to_string()))?;
    let mailer = Mailer::Smtp(SmtpMailer::new(&config.smtp));

    let state = AppState { store, provider, mailer };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let shutdown = CancellationToken::new();

        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received — shutting down");
                signal_token.cancel();
            }
        });

        server::run(&config.bind, state, shutdown).await
    })
}
