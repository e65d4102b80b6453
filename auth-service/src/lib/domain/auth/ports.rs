use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthResponse;
use crate::domain::auth::models::LoginRequest;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::RefreshTokenId;
use crate::domain::auth::models::RefreshTokenRequest;
use crate::domain::auth::models::RefreshTokenResponse;
use crate::domain::auth::models::RegisterRequest;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::UserWithPasswordHash;

/// Port for the authentication domain service.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue an initial token pair.
    ///
    /// # Errors
    /// * `Validation` - Input failed validation
    /// * `UserAlreadyExists` - Email already registered (case-insensitive)
    /// * `Internal` - User or token persistence failed
    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError>;

    /// Authenticate an existing user and issue a token pair.
    ///
    /// Unknown-email and wrong-password failures are indistinguishable by
    /// both error variant and wall-clock time.
    ///
    /// # Errors
    /// * `Validation` - Input failed validation
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Internal` - Token persistence failed
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError>;

    /// Rotate a refresh token: issue a new access/refresh pair and revoke
    /// the presented token.
    ///
    /// Presenting an already-revoked token is treated as a breach signal and
    /// revokes every token of the owning user.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Blank, unknown, or expired token
    /// * `TokenReuseDetected` - Revoked token presented again
    /// * `UserNotFound` - Owning user no longer exists
    /// * `Internal` - New token could not be durably stored
    async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, AuthError>;

    /// Revoke every active refresh token of a user ("log out everywhere").
    ///
    /// # Returns
    /// Number of tokens revoked
    async fn revoke_all_user_tokens(&self, user_id: UserId) -> Result<u64, AuthError>;

    /// Look up a user by id. No side effects.
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;
}

/// Persistence operations for users.
///
/// Each call is one logical transaction; the service never caches users
/// across calls.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Returns
    /// The created user, or `None` if storage refused the write (duplicate
    /// email or storage error). The caller maps `None` to an internal
    /// failure because duplicates are checked beforehand.
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Look up a user by (sanitized, lower-cased) email, including the
    /// stored password hash for verification.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPasswordHash>, AuthError>;

    /// Look up a user by id.
    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError>;
}

/// Persistence operations for refresh tokens.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a new refresh token record.
    ///
    /// # Returns
    /// The created record, or `None` if storage refused the write. A user
    /// must never receive a token that was not durably recorded, so callers
    /// fail the whole operation on `None`.
    async fn create_refresh_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AuthError>;

    /// Look up a token record by its hash (the unique lookup key).
    async fn find_by_token_hash(&self, token_hash: &str)
        -> Result<Option<RefreshToken>, AuthError>;

    /// Mark a single token revoked.
    ///
    /// # Returns
    /// `true` if a token was revoked, `false` if no such token exists
    async fn revoke_token(&self, token_id: RefreshTokenId) -> Result<bool, AuthError>;

    /// Mark every non-revoked token of a user revoked.
    ///
    /// # Returns
    /// Number of tokens newly revoked (idempotent: repeating returns 0)
    async fn revoke_all_user_tokens(&self, user_id: UserId) -> Result<u64, AuthError>;

    /// Housekeeping: delete rows past their expiry.
    ///
    /// # Returns
    /// Number of rows deleted
    async fn delete_expired_tokens(&self) -> Result<u64, AuthError>;
}
