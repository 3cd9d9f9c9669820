//! Client-side checks run before any network call. Name and phone inputs are
//! stripped of disallowed characters as they are typed; the pattern hints are
//! the same ones the form fields expose for native validation.

use super::{
    errors::WorkflowError,
    types::{LoginForm, PendingRegistration, RegistrationForm},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

/// `pattern`/`title` pair attached to a form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldHint {
    pub pattern: &'static str,
    pub title: &'static str,
}

pub const NAME_HINT: FieldHint = FieldHint {
    pattern: r"[\p{L}\s]+",
    title: "Only letters and spaces are allowed.",
};

pub const PHONE_HINT: FieldHint = FieldHint {
    pattern: r"[0-9]+",
    title: "Only digits are allowed.",
};

const NAME_DISALLOWED: &str = r"[^\p{L}\s]";
const PHONE_DISALLOWED: &str = r"[^0-9]";

/// Removes every character a name field does not accept.
#[must_use]
pub fn strip_name(input: &str) -> String {
    strip(NAME_DISALLOWED, input)
}

/// Removes every non-digit from a phone field.
#[must_use]
pub fn strip_phone(input: &str) -> String {
    strip(PHONE_DISALLOWED, input)
}

fn strip(disallowed: &str, input: &str) -> String {
    Regex::new(disallowed).map_or_else(
        |_| input.to_string(),
        |re| re.replace_all(input, "").into_owned(),
    )
}

/// Full-match check against a field hint pattern.
#[must_use]
pub fn matches_hint(hint: FieldHint, value: &str) -> bool {
    Regex::new(&format!("^(?:{})$", hint.pattern)).map_or(false, |re| re.is_match(value))
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Strips and validates a registration form.
///
/// # Errors
/// Returns [`WorkflowError::Validation`] naming the first field that fails.
pub fn validate_registration(form: &RegistrationForm) -> Result<PendingRegistration, WorkflowError> {
    let name = strip_name(&form.name).trim().to_string();
    let email = form.email.trim().to_string();
    let phone = strip_phone(&form.phone);
    let password = form.password.expose_secret();

    if name.is_empty() || email.is_empty() || phone.is_empty() || password.is_empty() {
        return Err(WorkflowError::Validation(
            "Name, email, phone and password are required.".to_string(),
        ));
    }
    if !matches_hint(NAME_HINT, &name) {
        return Err(WorkflowError::Validation(NAME_HINT.title.to_string()));
    }
    if !matches_hint(PHONE_HINT, &phone) {
        return Err(WorkflowError::Validation(PHONE_HINT.title.to_string()));
    }
    if !valid_email(&email) {
        return Err(WorkflowError::Validation(
            "Email address looks invalid.".to_string(),
        ));
    }

    Ok(PendingRegistration {
        name,
        email,
        phone,
        password: SecretString::from(password.to_string()),
    })
}

/// Checks that a login form is complete; returns the trimmed email.
///
/// # Errors
/// Returns [`WorkflowError::Validation`] if a field is missing or malformed.
pub fn validate_login(form: &LoginForm) -> Result<String, WorkflowError> {
    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.expose_secret().is_empty() {
        return Err(WorkflowError::Validation(
            "Email and password are required.".to_string(),
        ));
    }
    if !valid_email(&email) {
        return Err(WorkflowError::Validation(
            "Email address looks invalid.".to_string(),
        ));
    }
    Ok(email)
}
