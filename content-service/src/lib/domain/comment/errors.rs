use thiserror::Error;

/// Top-level error for all comment-related operations
#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Invalid comment content: {0}")]
    InvalidContent(String),

    #[error("Post not found: {0}")]
    PostNotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Store call timed out: {0}")]
    Timeout(String),
}
