use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::create_comment::CommentData;
use super::ApiError;
use super::ApiSuccess;
use crate::comment::models::Comment;
use crate::inbound::http::router::AppState;
use crate::post::models::Post;
use crate::post::models::PostId;

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<ApiSuccess<GetPostResponseData>, ApiError> {
    let post = state.post_service.get_post(PostId(post_id)).await?;
    let comments = state
        .comment_service
        .comments_for_post(post.id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        GetPostResponseData::new(&post, &comments),
    ))
}

/// The version token rides along so clients can echo it back on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetPostResponseData {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<CommentData>,
}

impl GetPostResponseData {
    fn new(post: &Post, comments: &[Comment]) -> Self {
        Self {
            id: post.id.0,
            title: post.title.clone(),
            content: post.content.clone(),
            owner_id: post.owner_id.as_i64(),
            tags: post.tags.clone(),
            version: post.version,
            created_at: post.created_at,
            updated_at: post.updated_at,
            comments: comments.iter().map(CommentData::from).collect(),
        }
    }
}
