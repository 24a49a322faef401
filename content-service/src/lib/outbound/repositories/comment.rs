use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::QUERY_TIMEOUT;
use crate::comment::errors::CommentError;
use crate::comment::models::Comment;
use crate::comment::models::CommentId;
use crate::comment::models::NewComment;
use crate::comment::ports::CommentRepository;
use crate::post::models::PostId;
use crate::user::models::UserId;

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    author_username: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId(row.id),
            post_id: PostId(row.post_id),
            author_id: UserId(row.author_id),
            author_username: row.author_username,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

fn db_error(e: sqlx::Error) -> CommentError {
    CommentError::DatabaseError(e.to_string())
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, CommentError> {
        // Insert and resolve the author's username in one round trip.
        let query = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, author_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, author_id, content, created_at
            )
            SELECT i.id, i.post_id, i.author_id,
                   u.username AS author_username,
                   i.content, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(comment.post_id.0)
        .bind(comment.author_id.0)
        .bind(&comment.content)
        .fetch_one(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| CommentError::Timeout("comment create".to_string()))?
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation()
                        && db_err.constraint() == Some("comments_post_id_fkey")
                    {
                        return CommentError::PostNotFound(comment.post_id.0);
                    }
                }
                db_error(e)
            })?;

        Ok(row.into())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentError> {
        let query = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.author_id,
                   u.username AS author_username,
                   c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(post_id.0)
        .fetch_all(&self.pool);

        let rows = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| CommentError::Timeout("comment list".to_string()))?
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}
