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
use crate::inbound::http::router::AppState;
use crate::post::models::CreatePostCommand;
use crate::post::models::Post;
use crate::user::models::Identity;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Json(body): Json<CreatePostRequest>,
) -> Result<ApiSuccess<CreatePostResponseData>, ApiError> {
    let command = CreatePostCommand {
        title: body.title,
        content: body.content,
        tags: body.tags.unwrap_or_default(),
    };

    state
        .post_service
        .create_post(&actor, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

/// HTTP request body for creating a post (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePostRequest {
    title: String,
    content: String,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePostResponseData {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for CreatePostResponseData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.0,
            title: post.title.clone(),
            content: post.content.clone(),
            owner_id: post.owner_id.as_i64(),
            tags: post.tags.clone(),
            version: post.version,
            created_at: post.created_at,
        }
    }
}
