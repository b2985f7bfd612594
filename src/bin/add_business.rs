//! Interactive shell for authoring a new business config.
//!
//! Prompts the operator for business details and FAQs, assembles the config
//! through `bizchat::authoring`, and writes it under the businesses
//! directory. Offline tool — never part of the serving path.

use std::io::{self, BufRead, Write};

use bizchat::authoring::{self, AuthoringInput};
use bizchat::config;
use bizchat::error::AppError;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let _ = dotenvy::dotenv();
    let config = config::load()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock();

    println!("=== Add New Business Chatbot ===\n");

    let business_name = prompt(&mut lines, "Business name: ")?;
    let business_id = prompt(&mut lines, "Business ID (lowercase, no spaces, use hyphens): ")?;
    if business_name.is_empty() || business_id.is_empty() {
        return Err(AppError::Config("business name and ID are required".into()));
    }

    println!("\nEnter business information (press Enter to skip optional fields):\n");

    let location = prompt(&mut lines, "Address: ")?;
    let phone = prompt(&mut lines, "Phone: ")?;
    let email = prompt(&mut lines, "Email: ")?;
    let hours = prompt(&mut lines, "Hours (e.g., 'Mon-Fri 9-5, Sat 10-4'): ")?;

    println!("\nEnter your top FAQs (type 'done' when finished):");
    let mut faqs = Vec::new();
    loop {
        let faq = prompt(&mut lines, &format!("FAQ {} (or 'done'): ", faqs.len() + 1))?;
        if faq.eq_ignore_ascii_case("done") {
            break;
        }
        if !faq.is_empty() {
            faqs.push(faq);
        }
    }

    let input = AuthoringInput {
        business_name,
        business_id,
        location,
        phone,
        email,
        hours,
        faqs,
    };

    let record = authoring::assemble(&input);
    let path = authoring::write(&config.businesses_dir, &record)?;

    println!("\nCreated config at: {}", path.display());
    println!("Business ID: {}", record.business_id);
    println!("\nNext steps:");
    println!("1. Review and edit the config file if needed");
    println!("2. Restart the server to pick up the new business");
    println!(
        "3. Give the client embed code with business_id: '{}'",
        record.business_id
    );

    Ok(())
}

/// Print `label`, read one line, return it trimmed. EOF counts as empty.
fn prompt(lines: &mut impl BufRead, label: &str) -> Result<String, AppError> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    lines.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
