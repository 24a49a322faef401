use std::sync::Arc;

use crate::comment::errors::CommentError;
use crate::comment::models::Comment;
use crate::comment::models::CreateCommentCommand;
use crate::comment::models::NewComment;
use crate::comment::ports::CommentRepository;
use crate::post::errors::PostError;
use crate::post::models::PostId;
use crate::post::ports::PostRepository;
use crate::user::models::Identity;

/// Upper bound on comment body length, in characters.
const MAX_CONTENT_LENGTH: usize = 1000;

/// Domain service for comments on posts.
///
/// Any authenticated identity may comment on any existing post; the post is
/// looked up first so commenting on a missing post is a clean `PostNotFound`
/// rather than a surfaced constraint violation.
pub struct CommentService<CR, PR>
where
    CR: CommentRepository,
    PR: PostRepository,
{
    comments: Arc<CR>,
    posts: Arc<PR>,
}

impl<CR, PR> CommentService<CR, PR>
where
    CR: CommentRepository,
    PR: PostRepository,
{
    pub fn new(comments: Arc<CR>, posts: Arc<PR>) -> Self {
        Self {
            comments,
            posts,
        }
    }

    /// Create a comment on a post, authored by the acting identity.
    ///
    /// # Errors
    /// * `InvalidContent` - Body is blank or exceeds the length bound
    /// * `PostNotFound` - Target post does not exist
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn create_comment(
        &self,
        actor: &Identity,
        post_id: PostId,
        command: CreateCommentCommand,
    ) -> Result<Comment, CommentError> {
        let content = command.content.trim().to_string();
        if content.is_empty() {
            return Err(CommentError::InvalidContent(
                "Comment content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(CommentError::InvalidContent(format!(
                "Comment content cannot exceed {} characters",
                MAX_CONTENT_LENGTH
            )));
        }

        self.posts
            .find_by_id(post_id)
            .await
            .map_err(store_error)?
            .ok_or(CommentError::PostNotFound(post_id.0))?;

        self.comments
            .create(NewComment {
                post_id,
                author_id: actor.id,
                content,
            })
            .await
    }

    /// List all comments on a post, newest first.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentError> {
        self.comments.list_for_post(post_id).await
    }
}

fn store_error(error: PostError) -> CommentError {
    match error {
        PostError::Timeout(message) => CommentError::Timeout(message),
        other => CommentError::DatabaseError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::authorization::models::Role;
    use crate::authorization::models::RoleKey;
    use crate::comment::models::CommentId;
    use crate::post::models::FeedItem;
    use crate::post::models::FeedQuery;
    use crate::post::models::NewPost;
    use crate::post::models::Post;
    use crate::user::models::EmailAddress;
    use crate::user::models::UserId;
    use crate::user::models::Username;

    mock! {
        pub TestCommentRepository {}

        #[async_trait]
        impl CommentRepository for TestCommentRepository {
            async fn create(&self, comment: NewComment) -> Result<Comment, CommentError>;
            async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentError>;
        }
    }

    mock! {
        pub TestPostRepository {}

        #[async_trait]
        impl PostRepository for TestPostRepository {
            async fn create(&self, post: NewPost) -> Result<Post, PostError>;
            async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError>;
            async fn update_if_version_matches(&self, post: &Post) -> Result<Post, PostError>;
            async fn delete(&self, id: PostId) -> Result<(), PostError>;
            async fn feed(&self, user: UserId, query: FeedQuery) -> Result<Vec<FeedItem>, PostError>;
        }
    }

    fn identity(id: i64) -> Identity {
        Identity {
            id: UserId(id),
            username: Username::new(format!("user{}", id)).unwrap(),
            email: EmailAddress::new(format!("user{}@example.com", id)).unwrap(),
            role: Role {
                key: RoleKey::User,
                level: 1,
            },
            active: true,
            created_at: Utc::now(),
        }
    }

    fn post(id: i64, owner: i64) -> Post {
        Post {
            id: PostId(id),
            title: "title".to_string(),
            content: "content".to_string(),
            owner_id: UserId(owner),
            tags: vec![],
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_comment_trims_and_stores_content() {
        let mut comments = MockTestCommentRepository::new();
        let mut posts = MockTestPostRepository::new();

        posts
            .expect_find_by_id()
            .with(eq(PostId(10)))
            .times(1)
            .returning(|_| Ok(Some(post(10, 1))));
        comments
            .expect_create()
            .withf(|new_comment| {
                new_comment.post_id == PostId(10)
                    && new_comment.author_id == UserId(2)
                    && new_comment.content == "nice post"
            })
            .times(1)
            .returning(|new_comment| {
                Ok(Comment {
                    id: CommentId(1),
                    post_id: new_comment.post_id,
                    author_id: new_comment.author_id,
                    author_username: "user2".to_string(),
                    content: new_comment.content,
                    created_at: Utc::now(),
                })
            });

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let actor = identity(2);

        let created = service
            .create_comment(
                &actor,
                PostId(10),
                CreateCommentCommand {
                    content: "  nice post  ".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.content, "nice post");
        assert_eq!(created.author_username, "user2");
    }

    #[tokio::test]
    async fn test_create_comment_rejects_blank_content() {
        let mut comments = MockTestCommentRepository::new();
        let mut posts = MockTestPostRepository::new();

        posts.expect_find_by_id().times(0);
        comments.expect_create().times(0);

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let actor = identity(2);

        let result = service
            .create_comment(
                &actor,
                PostId(10),
                CreateCommentCommand {
                    content: "   ".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn test_create_comment_rejects_oversized_content() {
        let mut comments = MockTestCommentRepository::new();
        let mut posts = MockTestPostRepository::new();

        posts.expect_find_by_id().times(0);
        comments.expect_create().times(0);

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let actor = identity(2);

        let result = service
            .create_comment(
                &actor,
                PostId(10),
                CreateCommentCommand {
                    content: "x".repeat(1001),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn test_create_comment_on_missing_post_is_not_found() {
        let mut comments = MockTestCommentRepository::new();
        let mut posts = MockTestPostRepository::new();

        posts
            .expect_find_by_id()
            .with(eq(PostId(99)))
            .times(1)
            .returning(|_| Ok(None));
        comments.expect_create().times(0);

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));
        let actor = identity(2);

        let result = service
            .create_comment(
                &actor,
                PostId(99),
                CreateCommentCommand {
                    content: "hello".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(CommentError::PostNotFound(99))));
    }

    #[tokio::test]
    async fn test_comments_for_post_delegates_to_repository() {
        let mut comments = MockTestCommentRepository::new();
        let posts = MockTestPostRepository::new();

        comments
            .expect_list_for_post()
            .with(eq(PostId(10)))
            .times(1)
            .returning(|post_id| {
                Ok(vec![Comment {
                    id: CommentId(1),
                    post_id,
                    author_id: UserId(2),
                    author_username: "user2".to_string(),
                    content: "hello".to_string(),
                    created_at: Utc::now(),
                }])
            });

        let service = CommentService::new(Arc::new(comments), Arc::new(posts));

        let listed = service.comments_for_post(PostId(10)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, CommentId(1));
    }
}
