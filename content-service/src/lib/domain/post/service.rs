use std::sync::Arc;

use crate::authorization::evaluator::AuthorizationEvaluator;
use crate::authorization::models::RoleKey;
use crate::authorization::ports::RoleRepository;
use crate::post::errors::PostError;
use crate::post::models::CreatePostCommand;
use crate::post::models::FeedItem;
use crate::post::models::FeedQuery;
use crate::post::models::NewPost;
use crate::post::models::Post;
use crate::post::models::PostId;
use crate::post::models::UpdatePostCommand;
use crate::post::ports::PostRepository;
use crate::user::models::Identity;

/// Per-operation role requirements for non-owners.
const UPDATE_REQUIRED_ROLE: RoleKey = RoleKey::Moderator;
const DELETE_REQUIRED_ROLE: RoleKey = RoleKey::Admin;

/// Domain service for post operations.
///
/// All mutations take the resolved acting identity as an explicit argument
/// and route through the authorization evaluator; updates are guarded by the
/// version token so concurrent writers lose detectably instead of silently.
pub struct PostService<PR, RR>
where
    PR: PostRepository,
    RR: RoleRepository,
{
    repository: Arc<PR>,
    authorizer: AuthorizationEvaluator<RR>,
}

impl<PR, RR> PostService<PR, RR>
where
    PR: PostRepository,
    RR: RoleRepository,
{
    pub fn new(repository: Arc<PR>, roles: Arc<RR>) -> Self {
        Self {
            repository,
            authorizer: AuthorizationEvaluator::new(roles),
        }
    }

    /// Create a post owned by the acting identity.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn create_post(
        &self,
        actor: &Identity,
        command: CreatePostCommand,
    ) -> Result<Post, PostError> {
        let post = NewPost {
            title: command.title,
            content: command.content,
            owner_id: actor.id,
            tags: command.tags,
        };

        self.repository.create(post).await
    }

    /// Retrieve a post by id.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn get_post(&self, id: PostId) -> Result<Post, PostError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PostError::NotFound(id.0))
    }

    /// Update a post: owner, or Moderator-and-above.
    ///
    /// The write is conditional on the version read here; a concurrent
    /// writer in between makes this call fail with `Conflict`. The conflict
    /// is surfaced, never retried internally.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Caller is neither owner nor sufficiently privileged
    /// * `Conflict` - Version token went stale between read and write
    /// * `Authorization` - Required-role lookup failed (misconfiguration)
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn update_post(
        &self,
        actor: &Identity,
        id: PostId,
        command: UpdatePostCommand,
    ) -> Result<Post, PostError> {
        let mut post = self.get_post(id).await?;

        let allowed = self
            .authorizer
            .may_mutate(actor, post.owner_id, UPDATE_REQUIRED_ROLE)
            .await?;
        if !allowed {
            return Err(PostError::Forbidden);
        }

        if let Some(title) = command.title {
            post.title = title;
        }
        if let Some(content) = command.content {
            post.content = content;
        }
        if let Some(tags) = command.tags {
            post.tags = tags;
        }

        self.repository.update_if_version_matches(&post).await
    }

    /// Page through the acting identity's feed: their own posts plus posts
    /// by everyone they follow, newest first. The window is clamped rather
    /// than rejected, so any limit/offset pair yields a valid page.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn feed(
        &self,
        actor: &Identity,
        query: FeedQuery,
    ) -> Result<Vec<FeedItem>, PostError> {
        self.repository.feed(actor.id, query.clamped()).await
    }

    /// Delete a post: owner, or Admin.
    ///
    /// # Errors
    /// * `NotFound` - Post does not exist
    /// * `Forbidden` - Caller is neither owner nor sufficiently privileged
    /// * `Authorization` - Required-role lookup failed (misconfiguration)
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn delete_post(&self, actor: &Identity, id: PostId) -> Result<(), PostError> {
        let post = self.get_post(id).await?;

        let allowed = self
            .authorizer
            .may_mutate(actor, post.owner_id, DELETE_REQUIRED_ROLE)
            .await?;
        if !allowed {
            return Err(PostError::Forbidden);
        }

        self.repository.delete(id).await
    }
}
