use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::post::models::PostId;
use crate::user::models::Identity;

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Path(post_id): Path<i64>,
) -> Result<ApiSuccess<DeletePostResponseData>, ApiError> {
    state
        .post_service
        .delete_post(&actor, PostId(post_id))
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                DeletePostResponseData { deleted: post_id },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletePostResponseData {
    pub deleted: i64,
}
