use async_trait::async_trait;

use crate::comment::errors::CommentError;
use crate::comment::models::Comment;
use crate::comment::models::NewComment;
use crate::post::models::PostId;

/// Persistence operations for comments.
#[async_trait]
pub trait CommentRepository: Send + Sync + 'static {
    /// Persist a new comment and return it with its author's username.
    ///
    /// # Errors
    /// * `PostNotFound` - The target post does not exist
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn create(&self, comment: NewComment) -> Result<Comment, CommentError>;

    /// List all comments on a post, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentError>;
}
