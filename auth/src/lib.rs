//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the content service:
//! - Stateless bearer token issuance and validation (HS256 JWT)
//! - Password hashing (Argon2id)
//! - Invitation token generation and SHA-256 digests
//!
//! The service defines its own ports and adapts these implementations. Token
//! validation is pure: the same token validates identically until its expiry
//! passes, and no network or store access happens here.
//!
//! # Examples
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenAuthenticator;
//! use chrono::Duration;
//!
//! let authenticator = TokenAuthenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     "content-service",
//!     "content-service",
//! );
//! let token = authenticator.issue(42, Duration::hours(24)).unwrap();
//! let claims = authenticator.validate(&token).unwrap();
//! assert_eq!(claims.sub, 42);
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Invitation Tokens
//! ```
//! use auth::invite;
//!
//! let token = invite::generate();
//! assert_eq!(invite::hash_of(&token.plain), token.hash);
//! ```

pub mod invite;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use invite::InviteToken;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenAuthenticator;
pub use token::TokenError;
