use thiserror::Error;

/// Input validation failures.
///
/// One variant per violation so callers (and tests) can distinguish why an
/// input was rejected without parsing messages. `field` names the offending
/// input in user-facing text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid {field} format")]
    InvalidFormat { field: &'static str },

    #[error("{field} contains invalid characters")]
    InvalidCharacters { field: &'static str },

    #[error("This username is reserved")]
    ReservedUsername,

    #[error("Password must contain at least one letter")]
    PasswordMissingLetter,

    #[error("Password must contain at least one number")]
    PasswordMissingDigit,
}

/// Top-level error for all authentication operations.
///
/// A closed set: every failure an operation can produce is one of these
/// variants, and callers are expected to match on them. Messages are safe to
/// return to clients; infrastructure detail stays in logs.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or unsafe input; the caller can fix and retry.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Duplicate registration attempt.
    #[error("User with email {0} already exists")]
    UserAlreadyExists(String),

    /// Wrong password or unknown user at login. The message deliberately
    /// does not reveal which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Valid-looking refresh token but the owning user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Unknown, malformed, blank, or expired refresh token.
    #[error("{0}")]
    InvalidRefreshToken(String),

    /// A revoked refresh token was presented again: treated as theft, and
    /// every token of the owning user has been revoked as a side effect.
    #[error("Token reuse detected. All sessions have been terminated for security.")]
    TokenReuseDetected,

    /// Storage or infrastructure failure. The message is generic by
    /// construction; internals are logged, never returned.
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_message_does_not_leak_cause() {
        // Unknown email and wrong password must be externally identical
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid email or password");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: AuthError = ValidationError::Required { field: "Email" }.into();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.to_string(), "Email is required");
    }
}
