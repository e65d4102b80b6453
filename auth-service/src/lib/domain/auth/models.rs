use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Refresh token unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

impl RefreshTokenId {
    /// Generate a new random token ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RefreshTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registered user, as exposed to the rest of the system.
///
/// Deliberately does not carry the password hash; lookups that need to
/// verify a password use [`UserWithPasswordHash`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Unique, stored lower-cased
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Internal user representation including the stored password hash.
///
/// Only ever flows between the user store and the login path; never
/// serialized or returned to callers.
#[derive(Debug, Clone)]
pub struct UserWithPasswordHash {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserWithPasswordHash {
    /// Drop the password hash.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

/// Stored refresh token record.
///
/// The raw token value is never persisted; `token_hash` is its SHA-256
/// digest and doubles as the unique lookup key. The record is mutated only
/// to flip `is_revoked`/`revoked_at`; rows are otherwise immutable until the
/// expiry sweep deletes them.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    /// Owner reference (not ownership): a user may hold several active
    /// tokens, one per session or device.
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub is_revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Check whether the token has expired at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// ---------------------------------------------------------------------------
// Transport-agnostic request/response contracts. Field names are the JSON
// wire contract when exposed over HTTP.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Response to successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed access token
    pub token: String,
    /// Opaque refresh token (the only time the raw value leaves the server)
    pub refresh_token: String,
    pub user_id: String,
    pub username: String,
    pub email: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Response to a successful refresh-token rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_refresh_token_expiry_boundary() {
        let now = Utc::now();
        let token = RefreshToken {
            id: RefreshTokenId::new(),
            user_id: UserId::new(),
            token_hash: "hash".to_string(),
            expires_at: now,
            created_at: now - Duration::days(30),
            is_revoked: false,
            revoked_at: None,
        };

        // Expiry is inclusive: now >= expires_at
        assert!(token.is_expired(now));
        assert!(token.is_expired(now + Duration::seconds(1)));
        assert!(!token.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn test_auth_response_wire_names() {
        let response = AuthResponse {
            token: "t".to_string(),
            refresh_token: "r".to_string(),
            user_id: "u".to_string(),
            username: "alice".to_string(),
            email: "a@example.com".to_string(),
            expires_in: 3600,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "t");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["userId"], "u");
        assert_eq!(json["expiresIn"], 3600);
    }

    #[test]
    fn test_refresh_response_wire_names() {
        let response = RefreshTokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            user_id: "u".to_string(),
            expires_in: 3600,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
    }

    #[test]
    fn test_error_response_wire_name() {
        let response = ErrorResponse {
            message: "Invalid email or password".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Invalid email or password");
    }
}
