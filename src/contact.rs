//! Contact relay — validates contact-form submissions and sends them as
//! plain-text email over authenticated SMTP.
//!
//! Validation and body assembly are pure and run before any network
//! activity. Credentials come from `SMTP_EMAIL` / `SMTP_PASSWORD` at send
//! time, never from config, so rotating them needs no restart. The `Mailer`
//! enum mirrors the `LlmProvider` shape: `Smtp` for real delivery, `Dummy`
//! capture for tests.

use std::sync::{Arc, Mutex};

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum ContactError {
    /// Required field missing; reported before any connection is made.
    #[error("{0}")]
    Validation(String),
    /// SMTP credentials absent from the environment.
    #[error("SMTP credentials not configured")]
    Credentials,
    /// Transport or authentication failure during send.
    #[error("failed to send email: {0}")]
    Send(String),
}

// ── Form ──────────────────────────────────────────────────────────────────────

/// One contact-form submission. Transient — never persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ContactForm {
    /// Check required fields: a business name, and at least one of
    /// email/phone. Each failure names the constraint that broke.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.business_name.trim().is_empty() {
            return Err(ContactError::Validation("Business name is required".into()));
        }
        if non_blank(&self.email).is_none() && non_blank(&self.phone).is_none() {
            return Err(ContactError::Validation("Email or phone required".into()));
        }
        Ok(())
    }

    /// Email subject line for this submission.
    pub fn subject(&self) -> String {
        format!("New BizChatAssist Inquiry: {}", self.business_name.trim())
    }

    /// Fixed-format plain-text body: echoed contact fields with
    /// "Not provided" placeholders, the optional message, and a static footer.
    pub fn format_body(&self) -> String {
        format!(
            "\nNew Contact Form Submission from BizChatAssist.com\n\n\
             Business Name: {}\n\
             Email: {}\n\
             Phone: {}\n\n\
             Message:\n{}\n\n\
             ---\n\
             Received via bizchatassist.com contact form\n",
            self.business_name.trim(),
            non_blank(&self.email).unwrap_or("Not provided"),
            non_blank(&self.phone).unwrap_or("Not provided"),
            non_blank(&self.message).unwrap_or("No additional message"),
        )
    }
}

// ── Credentials ───────────────────────────────────────────────────────────────

/// SMTP account read from the environment at call time.
#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub email: String,
    pub password: String,
}

impl SmtpCredentials {
    pub fn from_env() -> Result<Self, ContactError> {
        let email = std::env::var("SMTP_EMAIL").ok().filter(|s| !s.is_empty());
        let password = std::env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(ContactError::Credentials),
        }
    }
}

// ── Mailer ────────────────────────────────────────────────────────────────────

/// All available mail backends. Enum dispatch, same pattern as `LlmProvider`.
#[derive(Debug, Clone)]
pub enum Mailer {
    Smtp(SmtpMailer),
    Dummy(DummyMailer),
}

impl Mailer {
    /// Validate `form` and relay it. Validation failures short-circuit
    /// before credentials are read or any connection is opened.
    pub async fn send_contact(&self, form: &ContactForm) -> Result<(), ContactError> {
        form.validate()?;
        match self {
            Mailer::Smtp(m) => m.send(form).await,
            Mailer::Dummy(m) => m.send(form),
        }
    }
}

/// Real SMTP delivery over implicit TLS.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    relay: String,
    port: u16,
    to_addr: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Self {
        Self {
            relay: config.relay.clone(),
            port: config.port,
            to_addr: config.to_addr.clone(),
        }
    }

    async fn send(&self, form: &ContactForm) -> Result<(), ContactError> {
        // Credentials checked first — a different failure mode than a
        // transport error, and no connection is attempted without them.
        let creds = SmtpCredentials::from_env()?;

        let message = Message::builder()
            .from(creds.email.parse().map_err(|e| ContactError::Send(format!("bad from address: {e}")))?)
            .to(self.to_addr.parse().map_err(|e| ContactError::Send(format!("bad to address: {e}")))?)
            .subject(form.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(form.format_body())
            .map_err(|e| ContactError::Send(format!("message build failed: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)
            .map_err(|e| ContactError::Send(format!("relay setup failed: {e}")))?
            .port(self.port)
            .credentials(Credentials::new(creds.email, creds.password))
            .build();

        transport.send(message).await.map_err(|e| {
            error!(relay = %self.relay, error = %e, "contact email send failed");
            ContactError::Send(e.to_string())
        })?;

        info!(business_name = %form.business_name, "contact form email sent");
        Ok(())
    }
}

/// Capture mailer for tests — records every accepted submission.
#[derive(Debug, Clone, Default)]
pub struct DummyMailer {
    sent: Arc<Mutex<Vec<ContactForm>>>,
}

impl DummyMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions that passed validation and "went out".
    pub fn sent(&self) -> Vec<ContactForm> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn send(&self, form: &ContactForm) -> Result<(), ContactError> {
        self.sent.lock().unwrap().push(form.clone());
        Ok(())
    }
}
