use thiserror::Error;

use crate::authorization::errors::AuthorizationError;

/// Top-level error for all post-related operations
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// The presented version no longer matches the stored row. Retryable by
    /// re-fetching and re-applying; never retried here.
    #[error("Post was modified concurrently")]
    Conflict,

    /// Valid caller, but neither owner nor holder of the required role.
    #[error("Operation not permitted")]
    Forbidden,

    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store call timed out: {0}")]
    Timeout(String),
}
