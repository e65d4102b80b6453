//! Input validation and sanitization for authentication.
//!
//! Pure functions over raw strings; no I/O. Validation runs before any
//! credential work so malformed or dangerous input never reaches the
//! password hasher or the stores.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::auth::errors::ValidationError;

// Length constraints
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 100;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

// Alphanumeric plus safe punctuation only
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.\-]+$").expect("valid username regex"));

// onclick=, onerror=, etc.
static EVENT_HANDLER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+\s*=").expect("valid event handler regex"));

/// Usernames that look like system accounts.
const RESERVED_USERNAMES: [&str; 6] = [
    "admin",
    "root",
    "system",
    "administrator",
    "null",
    "undefined",
];

/// Check for substrings that could smuggle markup or script into downstream
/// consumers.
fn contains_dangerous_patterns(input: &str) -> bool {
    let lower = input.to_lowercase();
    lower.contains("<script")
        || lower.contains("javascript:")
        || input.contains('\u{0}')
        || EVENT_HANDLER_REGEX.is_match(input)
}

/// C0 control characters and DEL.
fn contains_control_characters(input: &str) -> bool {
    input
        .chars()
        .any(|c| (c as u32) <= 31 || (c as u32) == 127)
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "Email" });
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Email",
            max: MAX_EMAIL_LENGTH,
        });
    }

    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat { field: "email" });
    }

    if contains_dangerous_patterns(trimmed) || contains_control_characters(trimmed) {
        return Err(ValidationError::InvalidCharacters { field: "Email" });
    }

    // Guard against multiple @ even if the format regex were loosened
    if trimmed.matches('@').count() > 1 {
        return Err(ValidationError::InvalidFormat { field: "email" });
    }

    Ok(())
}

/// Validate a username.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "Username" });
    }

    if trimmed.len() < MIN_USERNAME_LENGTH {
        return Err(ValidationError::TooShort {
            field: "Username",
            min: MIN_USERNAME_LENGTH,
        });
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Username",
            max: MAX_USERNAME_LENGTH,
        });
    }

    if !USERNAME_REGEX.is_match(trimmed) {
        return Err(ValidationError::InvalidCharacters { field: "Username" });
    }

    if contains_dangerous_patterns(trimmed) || contains_control_characters(trimmed) {
        return Err(ValidationError::InvalidCharacters { field: "Username" });
    }

    let lower = trimmed.to_lowercase();
    if RESERVED_USERNAMES.contains(&lower.as_str()) {
        return Err(ValidationError::ReservedUsername);
    }

    Ok(())
}

/// Validate a password for registration (strength rules included).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::Required { field: "Password" });
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "Password",
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Password",
            max: MAX_PASSWORD_LENGTH,
        });
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(ValidationError::PasswordMissingLetter);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }

    if password.contains('\u{0}') {
        return Err(ValidationError::InvalidCharacters { field: "Password" });
    }

    Ok(())
}

/// Sanitize an email for storage and lookup: trim and lower-case.
pub fn sanitize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sanitize a username for storage: trim only, case is preserved.
pub fn sanitize_username(username: &str) -> String {
    username.trim().to_string()
}

/// Validate all registration inputs, short-circuiting on the first failure.
pub fn validate_registration_input(
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), ValidationError> {
    validate_email(email)?;
    validate_username(username)?;
    validate_password(password)?;
    Ok(())
}

/// Validate login inputs.
///
/// Password strength rules are intentionally skipped so that accounts
/// created under older policies can still log in; only presence and the
/// max-length bound are enforced (the bound avoids hashing pathologically
/// long inputs).
pub fn validate_login_input(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_email(email)?;

    if password.trim().is_empty() {
        return Err(ValidationError::Required { field: "Password" });
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "Password",
            max: MAX_PASSWORD_LENGTH,
        });
    }

    Ok(())
}
