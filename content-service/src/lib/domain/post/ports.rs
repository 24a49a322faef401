use async_trait::async_trait;

use crate::post::errors::PostError;
use crate::post::models::FeedItem;
use crate::post::models::FeedQuery;
use crate::post::models::NewPost;
use crate::post::models::Post;
use crate::post::models::PostId;
use crate::user::models::UserId;

/// Persistence operations for the post aggregate.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static {
    /// Persist a new post at version 1.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn create(&self, post: NewPost) -> Result<Post, PostError>;

    /// Retrieve a post by id.
    ///
    /// # Returns
    /// Optional post (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError>;

    /// Conditionally update a post: new fields are written and the version
    /// incremented by 1 only where the stored version still equals
    /// `post.version`. One atomic statement; no read-modify-write window.
    ///
    /// # Returns
    /// The updated post with its incremented version
    ///
    /// # Errors
    /// * `Conflict` - Zero rows matched: the row was concurrently modified
    ///   (or deleted) since the caller's read
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn update_if_version_matches(&self, post: &Post) -> Result<Post, PostError>;

    /// Remove a post.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn delete(&self, id: PostId) -> Result<(), PostError>;

    /// Page through posts authored by `user` or by anyone `user` follows,
    /// newest first, each with author username and comment count.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn feed(&self, user: UserId, query: FeedQuery) -> Result<Vec<FeedItem>, PostError>;
}
