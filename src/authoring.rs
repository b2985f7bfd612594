//! Config authoring — pure assembly of a business config from operator
//! input, plus the file writer.
//!
//! The interactive shell lives in the `add-business` binary; everything
//! testable is here. `assemble` is deterministic: labeled sections appear
//! only when the source field is non-empty, in a fixed order.

use std::{fs, path::Path, path::PathBuf};

use crate::error::AppError;
use crate::store::{BusinessConfig, FallbackContact};

/// Token budget written for newly authored businesses.
const AUTHORED_MAX_TOKENS: u32 = 150;

/// Operator-supplied business details. All fields but name and id optional;
/// empty strings mean "skipped".
#[derive(Debug, Clone, Default)]
pub struct AuthoringInput {
    pub business_name: String,
    pub business_id: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub faqs: Vec<String>,
}

/// Build the full config record, assembling the system prompt section by
/// section.
pub fn assemble(input: &AuthoringInput) -> BusinessConfig {
    let mut prompt = format!(
        "You are the virtual assistant for {}. Your job is to answer customer \
         questions clearly and helpfully.\n\n",
        input.business_name
    );

    if !input.location.is_empty() {
        prompt.push_str(&format!("LOCATION:\n{}\n\n", input.location));
    }

    if !input.hours.is_empty() {
        prompt.push_str(&format!("HOURS:\n{}\n\n", input.hours));
    }

    if !input.phone.is_empty() || !input.email.is_empty() {
        prompt.push_str("CONTACT:\n");
        if !input.phone.is_empty() {
            prompt.push_str(&format!("Phone: {}\n", input.phone));
        }
        if !input.email.is_empty() {
            prompt.push_str(&format!("Email: {}\n", input.email));
        }
        prompt.push('\n');
    }

    if !input.faqs.is_empty() {
        prompt.push_str("FREQUENTLY ASKED QUESTIONS:\n");
        for faq in &input.faqs {
            prompt.push_str(&format!("- {faq}\n"));
        }
        prompt.push('\n');
    }

    let reach = if input.phone.is_empty() { "us" } else { input.phone.as_str() };
    prompt.push_str(&format!(
        "IMPORTANT: If asked about anything outside your scope, politely direct \
         them to call {reach} or visit our website."
    ));

    BusinessConfig {
        business_id: input.business_id.clone(),
        business_name: input.business_name.clone(),
        system_prompt: prompt,
        fallback_contact: FallbackContact {
            phone: Some(input.phone.clone()).filter(|s| !s.is_empty()),
            email: Some(input.email.clone()).filter(|s| !s.is_empty()),
        },
        max_tokens: AUTHORED_MAX_TOKENS,
    }
}

/// Write `config` under `root/<business_id>/config.json`, creating the
/// directory. Returns the path of the written file.
pub fn write(root: &Path, config: &BusinessConfig) -> Result<PathBuf, AppError> {
    let dir = root.join(&config.business_id);
    fs::create_dir_all(&dir)?;
    let path = dir.join("config.json");
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("serialize failed: {e}")))?;
    fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> AuthoringInput {
        AuthoringInput {
            business_name: "Mario's".into(),
            business_id: "marios-italian".into(),
            location: "123 Main St".into(),
            phone: "555-1234".into(),
            email: "mario@example.com".into(),
            hours: "Mon-Fri 9-5".into(),
            faqs: vec!["Do you deliver?".into()],
        }
    }

    #[test]
    fn all_sections_present_when_fields_given() {
        let config = assemble(&full_input());
        let p = &config.system_prompt;
        assert!(p.contains("LOCATION:\n123 Main St"));
        assert!(p.contains("HOURS:\nMon-Fri 9-5"));
        assert!(p.contains("CONTACT:\nPhone: 555-1234\nEmail: mario@example.com"));
        assert!(p.contains("FREQUENTLY ASKED QUESTIONS:\n- Do you deliver?"));
        assert!(p.contains("call 555-1234"));
    }

    #[test]
    fn empty_fields_omit_their_sections() {
        let input = AuthoringInput {
            business_name: "Mario's".into(),
            business_id: "marios-italian".into(),
            ..Default::default()
        };
        let config = assemble(&input);
        let p = &config.system_prompt;
        assert!(!p.contains("LOCATION:"));
        assert!(!p.contains("HOURS:"));
        assert!(!p.contains("CONTACT:"));
        assert!(!p.contains("FREQUENTLY ASKED QUESTIONS:"));
        assert!(p.contains("call us or visit our website"));
    }

    #[test]
    fn fallback_contact_mirrors_input() {
        let config = assemble(&full_input());
        assert_eq!(config.fallback_contact.phone.as_deref(), Some("555-1234"));
        assert_eq!(config.fallback_contact.email.as_deref(), Some("mario@example.com"));

        let minimal = assemble(&AuthoringInput {
            business_name: "X".into(),
            business_id: "x".into(),
            ..Default::default()
        });
        assert_eq!(minimal.fallback_contact, FallbackContact::default());
    }

    #[test]
    fn authored_budget_is_150() {
        assert_eq!(assemble(&full_input()).max_tokens, AUTHORED_MAX_TOKENS);
    }

    #[test]
    fn assembly_is_deterministic() {
        let input = full_input();
        assert_eq!(assemble(&input).system_prompt, assemble(&input).system_prompt);
    }
}
