use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthResponse;
use crate::domain::auth::models::LoginRequest;
use crate::domain::auth::models::RefreshTokenRequest;
use crate::domain::auth::models::RefreshTokenResponse;
use crate::domain::auth::models::RegisterRequest;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::RefreshTokenStore;
use crate::domain::auth::ports::UserStore;
use crate::domain::auth::validation;

/// Authentication domain service.
///
/// Orchestrates registration, login, and refresh-token rotation over the
/// injected stores. Holds no in-process state beyond its collaborators:
/// correctness under concurrency relies on each store call being one
/// logical transaction.
pub struct AuthService<U, R>
where
    U: UserStore,
    R: RefreshTokenStore,
{
    users: Arc<U>,
    refresh_tokens: Arc<R>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: Arc<PasswordHasher>,
}

impl<U, R> AuthService<U, R>
where
    U: UserStore,
    R: RefreshTokenStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `token_issuer` - Configured access/refresh token issuer
    pub fn new(users: Arc<U>, refresh_tokens: Arc<R>, token_issuer: TokenIssuer) -> Self {
        Self {
            users,
            refresh_tokens,
            token_issuer: Arc::new(token_issuer),
            password_hasher: Arc::new(PasswordHasher::new()),
        }
    }

    /// Hash a password on the blocking pool.
    ///
    /// Argon2 is deliberately CPU-expensive; running it on the async
    /// executor would head-of-line block unrelated requests.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify a password on the blocking pool.
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Pay the cost of one password verification without having a hash.
    ///
    /// Keeps "user not found" and "wrong password" failure paths
    /// indistinguishable by latency. Never fails.
    async fn simulate_password_check(&self) {
        let hasher = Arc::clone(&self.password_hasher);
        let _ = tokio::task::spawn_blocking(move || hasher.simulate_check()).await;
    }

    /// Issue and durably record a token pair for a user.
    ///
    /// The refresh token is stored (hashed) before anything is returned: a
    /// caller must never hold a credential that persistence did not accept.
    async fn issue_token_pair(
        &self,
        user_id: UserId,
        email: &str,
    ) -> Result<(String, String), AuthError> {
        let access_token = self
            .token_issuer
            .generate_access_token(&user_id.to_string(), email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let refresh_token = self.token_issuer.generate_refresh_token();
        let token_hash = self.token_issuer.hash_refresh_token(&refresh_token);
        let expires_at = Utc::now() + self.token_issuer.refresh_ttl();

        self.refresh_tokens
            .create_refresh_token(user_id, &token_hash, expires_at)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!("Failed to store refresh token for user: {}", user_id))
            })?;

        Ok((access_token, refresh_token))
    }
}

#[async_trait]
impl<U, R> AuthServicePort for AuthService<U, R>
where
    U: UserStore,
    R: RefreshTokenStore,
{
    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if let Err(e) = validation::validate_registration_input(
            &request.email,
            &request.username,
            &request.password,
        ) {
            tracing::warn!(error = %e, "Registration validation failed");
            return Err(e.into());
        }

        let email = validation::sanitize_email(&request.email);
        let username = validation::sanitize_username(&request.username);

        if self.users.find_user_by_email(&email).await?.is_some() {
            tracing::warn!(email = %email, "Duplicate registration attempt");
            return Err(AuthError::UserAlreadyExists(email));
        }

        let password_hash = self.hash_password(request.password).await?;

        let user = self
            .users
            .create_user(&email, &username, &password_hash)
            .await?
            .ok_or_else(|| AuthError::Internal("Failed to create user".to_string()))?;

        let (token, refresh_token) = self.issue_token_pair(user.id, &user.email).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthResponse {
            token,
            refresh_token,
            user_id: user.id.to_string(),
            username: user.username,
            email: user.email,
            expires_in: self.token_issuer.access_ttl_seconds(),
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        if let Err(e) = validation::validate_login_input(&request.email, &request.password) {
            tracing::warn!(error = %e, "Login validation failed");
            // Pay the verification cost anyway so rejected input is not
            // distinguishable from a wrong password by latency
            self.simulate_password_check().await;
            return Err(e.into());
        }

        let email = validation::sanitize_email(&request.email);

        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login attempt for unknown email");
                self.simulate_password_check().await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            tracing::warn!(user_id = %user.id, "Invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let (token, refresh_token) = self.issue_token_pair(user.id, &user.email).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            refresh_token,
            user_id: user.id.to_string(),
            username: user.username,
            email: user.email,
            expires_in: self.token_issuer.access_ttl_seconds(),
        })
    }

    async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<RefreshTokenResponse, AuthError> {
        if request.refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidRefreshToken(
                "Refresh token cannot be blank".to_string(),
            ));
        }

        let token_hash = self.token_issuer.hash_refresh_token(&request.refresh_token);

        let stored = self
            .refresh_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Presented refresh token not found");
                AuthError::InvalidRefreshToken("Invalid refresh token".to_string())
            })?;

        // A revoked token being presented again means replay of a stolen
        // token (or a rotation race the service cannot distinguish from
        // one). Fail safe: terminate the whole session family.
        if stored.is_revoked {
            tracing::error!(user_id = %stored.user_id, "Refresh token reuse detected");
            if let Err(e) = self
                .refresh_tokens
                .revoke_all_user_tokens(stored.user_id)
                .await
            {
                tracing::error!(user_id = %stored.user_id, error = %e, "Failed to revoke token family");
            }
            return Err(AuthError::TokenReuseDetected);
        }

        let now = Utc::now();
        if stored.is_expired(now) {
            tracing::warn!(user_id = %stored.user_id, "Refresh token expired");
            if let Err(e) = self.refresh_tokens.revoke_token(stored.id).await {
                tracing::warn!(token_id = %stored.id, error = %e, "Failed to revoke expired token");
            }
            return Err(AuthError::InvalidRefreshToken(
                "Refresh token has expired".to_string(),
            ));
        }

        let user = match self.users.find_user_by_id(stored.user_id).await? {
            Some(user) => user,
            None => {
                tracing::warn!(user_id = %stored.user_id, "Owner of refresh token no longer exists");
                if let Err(e) = self.refresh_tokens.revoke_token(stored.id).await {
                    tracing::warn!(token_id = %stored.id, error = %e, "Failed to revoke orphaned token");
                }
                return Err(AuthError::UserNotFound);
            }
        };

        let access_token = self
            .token_issuer
            .generate_access_token(&user.id.to_string(), &user.email)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let new_refresh_token = self.token_issuer.generate_refresh_token();
        let new_token_hash = self.token_issuer.hash_refresh_token(&new_refresh_token);
        let expires_at = now + self.token_issuer.refresh_ttl();

        // Store the new token BEFORE revoking the old one. If this write
        // fails the old token stays valid and the session is not lost.
        self.refresh_tokens
            .create_refresh_token(user.id, &new_token_hash, expires_at)
            .await?
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "Failed to store new refresh token for user: {}",
                    user.id
                ))
            })?;

        // Revoke the old token now that the new one is durable. A failure
        // here is tolerated: the new token already works, and the stale row
        // is caught by the expiry sweep or by reuse detection if replayed.
        match self.refresh_tokens.revoke_token(stored.id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(token_id = %stored.id, "Old refresh token was not revoked");
            }
            Err(e) => {
                tracing::warn!(token_id = %stored.id, error = %e, "Failed to revoke old refresh token");
            }
        }

        tracing::info!(user_id = %user.id, "Refresh token rotated");

        Ok(RefreshTokenResponse {
            access_token,
            refresh_token: new_refresh_token,
            user_id: user.id.to_string(),
            expires_in: self.token_issuer.access_ttl_seconds(),
        })
    }

    async fn revoke_all_user_tokens(&self, user_id: UserId) -> Result<u64, AuthError> {
        let count = self.refresh_tokens.revoke_all_user_tokens(user_id).await?;
        tracing::info!(user_id = %user_id, count, "Revoked all user tokens");
        Ok(count)
    }

    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        self.users.find_user_by_id(user_id).await
    }
}
