use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::QUERY_TIMEOUT;
use crate::post::errors::PostError;
use crate::post::models::FeedItem;
use crate::post::models::FeedQuery;
use crate::post::models::NewPost;
use crate::post::models::Post;
use crate::post::models::PostId;
use crate::post::ports::PostRepository;
use crate::user::models::UserId;

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    owner_id: i64,
    tags: Vec<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: PostId(row.id),
            title: row.title,
            content: row.content,
            owner_id: UserId(row.owner_id),
            tags: row.tags,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    title: String,
    content: String,
    owner_id: i64,
    author_username: String,
    tags: Vec<String>,
    version: i32,
    created_at: DateTime<Utc>,
    comment_count: i64,
}

impl From<FeedRow> for FeedItem {
    fn from(row: FeedRow) -> Self {
        FeedItem {
            id: PostId(row.id),
            title: row.title,
            content: row.content,
            owner_id: UserId(row.owner_id),
            author_username: row.author_username,
            tags: row.tags,
            version: row.version,
            created_at: row.created_at,
            comment_count: row.comment_count,
        }
    }
}

fn db_error(e: sqlx::Error) -> PostError {
    PostError::DatabaseError(e.to_string())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let query = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content, owner_id, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, owner_id, tags, version, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.owner_id.0)
        .bind(&post.tags)
        .fetch_one(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| PostError::Timeout("post create".to_string()))?
            .map_err(db_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        let query = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, content, owner_id, tags, version, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| PostError::Timeout("post lookup".to_string()))?
            .map_err(db_error)?;

        Ok(row.map(Post::from))
    }

    async fn update_if_version_matches(&self, post: &Post) -> Result<Post, PostError> {
        // One conditional statement: the version check and the increment are
        // atomic, so a writer holding a stale version matches zero rows.
        let query = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET title = $1, content = $2, tags = $3,
                version = version + 1, updated_at = now()
            WHERE id = $4 AND version = $5
            RETURNING id, title, content, owner_id, tags, version, created_at, updated_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.tags)
        .bind(post.id.0)
        .bind(post.version)
        .fetch_optional(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| PostError::Timeout("post update".to_string()))?
            .map_err(db_error)?;

        row.map(Post::from).ok_or(PostError::Conflict)
    }

    async fn delete(&self, id: PostId) -> Result<(), PostError> {
        let query = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool);

        let result = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| PostError::Timeout("post delete".to_string()))?
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound(id.0));
        }

        Ok(())
    }

    async fn feed(&self, user: UserId, query: FeedQuery) -> Result<Vec<FeedItem>, PostError> {
        // Own posts plus posts by anyone the user follows; the id tiebreak
        // keeps pages stable when timestamps collide.
        let query = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT p.id, p.title, p.content, p.owner_id,
                   u.username AS author_username,
                   p.tags, p.version, p.created_at,
                   COUNT(c.id) AS comment_count
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            LEFT JOIN comments c ON c.post_id = p.id
            WHERE p.owner_id = $1
               OR p.owner_id IN (
                   SELECT user_id FROM followers WHERE follower_id = $1
               )
            GROUP BY p.id, u.username
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user.0)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool);

        let rows = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| PostError::Timeout("feed".to_string()))?
            .map_err(db_error)?;

        Ok(rows.into_iter().map(FeedItem::from).collect())
    }
}
