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
use crate::inbound::http::router::AppState;
use crate::post::models::Post;
use crate::post::models::PostId;
use crate::post::models::UpdatePostCommand;
use crate::user::models::Identity;

pub async fn update_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Path(post_id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<ApiSuccess<UpdatePostResponseData>, ApiError> {
    let command = UpdatePostCommand {
        title: body.title,
        content: body.content,
        tags: body.tags,
    };

    state
        .post_service
        .update_post(&actor, PostId(post_id), command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}

/// HTTP request body for updating a post (raw JSON). Absent fields are left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePostRequest {
    title: Option<String>,
    content: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePostResponseData {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub owner_id: i64,
    pub tags: Vec<String>,
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for UpdatePostResponseData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.0,
            title: post.title.clone(),
            content: post.content.clone(),
            owner_id: post.owner_id.as_i64(),
            tags: post.tags.clone(),
            version: post.version,
            updated_at: post.updated_at,
        }
    }
}
