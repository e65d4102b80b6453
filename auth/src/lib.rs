//! Authentication primitives library
//!
//! Provides reusable authentication infrastructure for services:
//! - Password hashing (Argon2id) with timing-attack mitigation
//! - JWT access token generation and validation
//! - Opaque refresh token generation and hashing
//!
//! The service layer defines its own domain traits and adapts these
//! implementations. Refresh tokens are deliberately *not* JWTs: they are
//! high-entropy random bearer strings whose validity is determined solely
//! by server-side lookup of their SHA-256 digest.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Issuance
//! ```
//! use auth::{TokenIssuer, TokenIssuerConfig};
//!
//! let issuer = TokenIssuer::new(TokenIssuerConfig {
//!     secret: "secret_key_at_least_32_bytes_long!".to_string(),
//!     issuer: "https://auth.example.com".to_string(),
//!     audience: "example-api".to_string(),
//!     ..Default::default()
//! });
//!
//! let access = issuer.generate_access_token("user123", "a@example.com").unwrap();
//! assert_eq!(issuer.verify_access_token(&access).as_deref(), Some("user123"));
//!
//! let refresh = issuer.generate_refresh_token();
//! let lookup_key = issuer.hash_refresh_token(&refresh);
//! assert_ne!(refresh, lookup_key);
//! ```

pub mod jwt;
pub mod password;
pub mod token_issuer;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token_issuer::TokenIssuer;
pub use token_issuer::TokenIssuerConfig;
