use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::user::models::UserId;

/// Post aggregate entity.
///
/// `version` is the optimistic-concurrency token: it increments by exactly 1
/// on every successful update, and a write presenting a stale version is
/// rejected instead of silently overwriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub i64);

impl PostId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for PostId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A post pending persistence.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
    pub tags: Vec<String>,
}

/// Command to create a new post
#[derive(Debug)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// One entry of a user's feed: a post by the user or by someone they
/// follow, enriched with the author's username and its comment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub owner_id: UserId,
    pub author_username: String,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

/// Feed pagination window, newest posts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub limit: i64,
    pub offset: i64,
}

impl FeedQuery {
    pub const DEFAULT_LIMIT: i64 = 20;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp the window to sane bounds; out-of-range values are corrected,
    /// never rejected.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.clamp(1, Self::MAX_LIMIT),
            offset: self.offset.max(0),
        }
    }
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Command to update an existing post with optional fields.
///
/// Only provided fields are changed; the version token comes from the
/// fetched post, not from the caller payload.
#[derive(Debug, Default)]
pub struct UpdatePostCommand {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}
