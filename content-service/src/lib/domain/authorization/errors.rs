use thiserror::Error;

/// Error for RoleKey parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleKeyError {
    #[error("Unknown role key: {0}")]
    Unknown(String),
}

/// Error for authorization decisions.
///
/// A missing required role is a hard error rather than a deny: the required
/// roles are reference data, so absence means misconfiguration.
#[derive(Debug, Clone, Error)]
pub enum AuthorizationError {
    #[error("Invalid role key: {0}")]
    InvalidRoleKey(#[from] RoleKeyError),

    #[error("Required role is not configured: {0}")]
    RoleNotConfigured(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Role lookup timed out")]
    Timeout,
}
