use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::comment::models::Comment;
use crate::comment::models::CreateCommentCommand;
use crate::inbound::http::router::AppState;
use crate::post::models::PostId;
use crate::user::models::Identity;

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<ApiSuccess<CommentData>, ApiError> {
    let command = CreateCommentCommand {
        content: body.content,
    };

    state
        .comment_service
        .create_comment(&actor, PostId(post_id), command)
        .await
        .map_err(ApiError::from)
        .map(|ref comment| ApiSuccess::new(StatusCode::CREATED, comment.into()))
}

/// HTTP request body for commenting on a post (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCommentRequest {
    content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentData {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.0,
            post_id: comment.post_id.0,
            author_id: comment.author_id.as_i64(),
            author_username: comment.author_username.clone(),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }
}
