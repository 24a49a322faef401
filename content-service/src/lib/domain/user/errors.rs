use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for cache operations.
///
/// The cache is advisory: the resolver logs these and falls back to the
/// store rather than failing the call.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache read failed: {0}")]
    ReadFailed(String),

    #[error("Cache write failed: {0}")]
    WriteFailed(String),
}

/// Error for notification dispatch.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Failed to render notification template: {0}")]
    TemplateFailed(String),

    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(i64),

    #[error("Invitation token not found or expired")]
    InvitationNotFound,

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Already following user {0}")]
    AlreadyFollowing(i64),

    // Infrastructure errors
    #[error("Notification dispatch failed: {0}")]
    Notification(#[from] NotifierError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store call timed out: {0}")]
    Timeout(String),
}
