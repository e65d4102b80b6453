use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Number of random bytes in an opaque refresh token (512 bits).
const REFRESH_TOKEN_BYTES: usize = 64;

/// Configuration for token issuance.
#[derive(Debug, Clone)]
pub struct TokenIssuerConfig {
    /// HMAC-SHA256 signing secret for access tokens
    pub secret: String,
    /// `iss` claim value, checked on verification
    pub issuer: String,
    /// `aud` claim value, checked on verification
    pub audience: String,
    /// Access token lifetime (default 1 hour)
    pub access_ttl: Duration,
    /// Refresh token lifetime (default 30 days)
    pub refresh_ttl: Duration,
}

impl Default for TokenIssuerConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: String::new(),
            audience: String::new(),
            access_ttl: Duration::seconds(3600),
            refresh_ttl: Duration::days(30),
        }
    }
}

/// Issues and verifies the two credential kinds of the auth subsystem.
///
/// Access tokens are signed, self-contained JWTs. Refresh tokens are opaque
/// high-entropy bearer strings: they carry no structure, are never parsed,
/// and only their SHA-256 digest is ever stored or compared. A fast one-way
/// hash is sufficient there because the token is already a 512-bit random
/// value, unlike a password, which needs a slow adaptive hash.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    config: TokenIssuerConfig,
}

impl TokenIssuer {
    /// Create a token issuer from configuration.
    pub fn new(config: TokenIssuerConfig) -> Self {
        Self {
            jwt_handler: JwtHandler::new(
                config.secret.as_bytes(),
                config.issuer.clone(),
                config.audience.clone(),
            ),
            config,
        }
    }

    /// Generate a signed access token for a user.
    ///
    /// # Errors
    /// * `JwtError` - Token encoding failed
    pub fn generate_access_token(&self, user_id: &str, email: &str) -> Result<String, JwtError> {
        let claims = AccessClaims::new(
            user_id,
            email,
            self.config.issuer.clone(),
            self.config.audience.clone(),
            self.config.access_ttl,
        );
        self.jwt_handler.encode(&claims)
    }

    /// Verify an access token and extract the user id.
    ///
    /// Fails closed: any signature, expiry, issuer, audience, or token-type
    /// mismatch yields `None`. Never returns an error to the caller.
    pub fn verify_access_token(&self, token: &str) -> Option<String> {
        self.jwt_handler
            .decode(token)
            .ok()
            .map(|claims| claims.user_id)
    }

    /// Generate an opaque refresh token.
    ///
    /// 64 bytes from a cryptographically secure RNG, URL-safe base64 without
    /// padding. This is a bearer credential, not a JWT.
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hash a refresh token for storage and lookup.
    ///
    /// SHA-256 digest, base64-encoded. The raw token value is never stored.
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        STANDARD.encode(hasher.finalize())
    }

    /// Seconds until a freshly issued access token expires.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.config.access_ttl.num_seconds()
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.config.refresh_ttl
    }
}
