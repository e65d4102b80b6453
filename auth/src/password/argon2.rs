use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Password the dummy hash is derived from. `simulate_check` always verifies
/// a *different* password against it, so the check fails while still paying
/// the full Argon2 cost.
const DUMMY_PASSWORD: &str = "dummy-password";

/// Precomputed valid hash used to equalize the latency of failure paths.
/// Computed once on first use so it always matches the current parameters.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| PasswordHasher::new().hash(DUMMY_PASSWORD).ok());

/// Password hashing implementation.
///
/// Provides adaptive, salted password hashing (Argon2id with the library
/// default parameters).
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// A fresh random salt is generated on every call, so hashing the same
    /// password twice yields two different outputs.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The comparison inside the hashing primitive is constant-time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or verification failed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Burn the cost of one real password verification.
    ///
    /// Called on login failure paths where no stored hash exists (unknown
    /// email, rejected input) so "user not found" and "wrong password" are
    /// indistinguishable by wall-clock time. Never panics and never returns
    /// an error: if the precomputed dummy hash is unavailable, a dummy hash
    /// operation of equivalent cost is performed instead.
    pub fn simulate_check(&self) {
        match DUMMY_HASH.as_deref() {
            Some(hash) => {
                let _ = self.verify("wrong-password", hash);
            }
            None => {
                let _ = self.hash(DUMMY_PASSWORD);
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
