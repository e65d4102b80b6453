use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claim value distinguishing access tokens from anything else that might
/// be signed with the same key.
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims carried by a signed access token.
///
/// The token is self-contained: verification is signature plus claim checks,
/// never a server-side lookup. Wire names follow the JSON contract of the
/// auth API (`userId`, `email`, `type`) alongside the registered RFC 7519
/// claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Owning user identifier
    #[serde(rename = "userId")]
    pub user_id: String,

    /// User email at issuance time
    pub email: String,

    /// Token type discriminator, always `"access"`
    #[serde(rename = "type")]
    pub token_type: String,

    /// Unique token identifier (random UUID v4)
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl AccessClaims {
    /// Create access claims expiring `ttl` from now.
    ///
    /// Every call produces a fresh `jti`, so two tokens for the same user
    /// issued in the same second are still distinct.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: user_id.into(),
            email: email.into(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
        }
    }

    /// Check the type discriminator.
    pub fn is_access(&self) -> bool {
        self.token_type == ACCESS_TOKEN_TYPE
    }
}
