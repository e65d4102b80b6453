#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;

use async_trait::async_trait;
use auth::TokenIssuer;
use auth::TokenIssuerConfig;
use auth_service::auth::errors::AuthError;
use auth_service::auth::models::RefreshToken;
use auth_service::auth::models::RefreshTokenId;
use auth_service::auth::models::User;
use auth_service::auth::models::UserId;
use auth_service::auth::models::UserWithPasswordHash;
use auth_service::auth::ports::RefreshTokenStore;
use auth_service::auth::ports::UserStore;
use auth_service::auth::service::AuthService;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

static TRACING: Once = Once::new();

/// Initialize log output for tests once per binary. Controlled by
/// `RUST_LOG`, silent by default.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
const TEST_ISSUER: &str = "http://localhost:8080";
const TEST_AUDIENCE: &str = "auth-service-tests";

/// In-memory user store backing integration tests.
pub struct InMemoryUserStore {
    users: Mutex<Vec<UserWithPasswordHash>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    /// Remove a user directly, simulating out-of-band deletion.
    pub fn remove_user(&self, user_id: UserId) {
        self.users
            .lock()
            .expect("user store lock poisoned")
            .retain(|u| u.id != user_id);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().expect("user store lock poisoned").len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AuthError> {
        let mut users = self.users.lock().expect("user store lock poisoned");
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = UserWithPasswordHash {
            id: UserId::new(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(Some(user.into_user()))
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPasswordHash>, AuthError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .map(UserWithPasswordHash::into_user))
    }
}

/// In-memory refresh token store backing integration tests.
pub struct InMemoryRefreshTokenStore {
    tokens: Mutex<Vec<RefreshToken>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn token_count(&self) -> usize {
        self.tokens.lock().expect("token store lock poisoned").len()
    }

    pub fn active_token_count(&self, user_id: UserId) -> usize {
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .iter()
            .filter(|t| t.user_id == user_id && !t.is_revoked)
            .count()
    }

    /// Whether any stored row holds the given value as its lookup key.
    pub fn contains_token_hash(&self, token_hash: &str) -> bool {
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .iter()
            .any(|t| t.token_hash == token_hash)
    }

    pub fn is_revoked(&self, token_hash: &str) -> bool {
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .iter()
            .any(|t| t.token_hash == token_hash && t.is_revoked)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create_refresh_token(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<RefreshToken>, AuthError> {
        let token = RefreshToken {
            id: RefreshTokenId::new(),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
            is_revoked: false,
            revoked_at: None,
        };
        self.tokens
            .lock()
            .expect("token store lock poisoned")
            .push(token.clone());
        Ok(Some(token))
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, AuthError> {
        let tokens = self.tokens.lock().expect("token store lock poisoned");
        Ok(tokens.iter().find(|t| t.token_hash == token_hash).cloned())
    }

    async fn revoke_token(&self, token_id: RefreshTokenId) -> Result<bool, AuthError> {
        let mut tokens = self.tokens.lock().expect("token store lock poisoned");
        match tokens.iter_mut().find(|t| t.id == token_id) {
            Some(token) => {
                token.is_revoked = true;
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_user_tokens(&self, user_id: UserId) -> Result<u64, AuthError> {
        let mut tokens = self.tokens.lock().expect("token store lock poisoned");
        let mut count = 0;
        for token in tokens
            .iter_mut()
            .filter(|t| t.user_id == user_id && !t.is_revoked)
        {
            token.is_revoked = true;
            token.revoked_at = Some(Utc::now());
            count += 1;
        }
        Ok(count)
    }

    async fn delete_expired_tokens(&self) -> Result<u64, AuthError> {
        let mut tokens = self.tokens.lock().expect("token store lock poisoned");
        let now = Utc::now();
        let before = tokens.len();
        tokens.retain(|t| now < t.expires_at);
        Ok((before - tokens.len()) as u64)
    }
}

/// Fully wired auth service over in-memory stores.
pub struct TestAuth {
    pub service: AuthService<InMemoryUserStore, InMemoryRefreshTokenStore>,
    pub users: Arc<InMemoryUserStore>,
    pub tokens: Arc<InMemoryRefreshTokenStore>,
    /// Separate issuer with the same configuration, for verifying tokens
    /// and computing lookup hashes from the outside
    pub issuer: TokenIssuer,
}

impl TestAuth {
    pub fn new() -> Self {
        Self::with_config(TokenIssuerConfig {
            secret: TEST_SECRET.to_string(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            ..Default::default()
        })
    }

    /// Build a service whose refresh tokens expire after `ttl`.
    /// `Duration::zero()` makes every issued token immediately expired.
    pub fn with_refresh_ttl(ttl: Duration) -> Self {
        Self::with_config(TokenIssuerConfig {
            secret: TEST_SECRET.to_string(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            refresh_ttl: ttl,
            ..Default::default()
        })
    }

    fn with_config(config: TokenIssuerConfig) -> Self {
        init_tracing();

        let users = Arc::new(InMemoryUserStore::new());
        let tokens = Arc::new(InMemoryRefreshTokenStore::new());
        let service = AuthService::new(
            Arc::clone(&users),
            Arc::clone(&tokens),
            TokenIssuer::new(config.clone()),
        );

        Self {
            service,
            users,
            tokens,
            issuer: TokenIssuer::new(config),
        }
    }
}
