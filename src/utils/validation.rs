//! Registration form validation

use std::sync::OnceLock;
use regex::Regex;
use serde::{Deserialize, Serialize};

const NAME_TOO_SHORT: &str = "Name must be at least 2 characters long";
const INVALID_EMAIL: &str = "Please enter a valid email address";

/// Fields submitted by the candidate before starting an exam
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: Option<String>,
    pub email: Option<String>,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Loose `local@domain.tld` shape check
pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Validate a registration form, returning error messages in field order
pub fn validate_form(form: &RegistrationForm) -> Vec<String> {
    let mut errors = Vec::new();

    let name_ok = form
        .name
        .as_deref()
        .is_some_and(|name| name.trim().chars().count() >= 2);
    if !name_ok {
        errors.push(NAME_TOO_SHORT.to_string());
    }

    let email_ok = form.email.as_deref().is_some_and(validate_email);
    if !email_ok {
        errors.push(INVALID_EMAIL.to_string());
    }

    errors
}
