use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::models::Identity;
use crate::user::models::UserId;

pub async fn follow_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Identity>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<FollowResponseData>, ApiError> {
    state
        .user_service
        .follow(actor.id, UserId(user_id))
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                FollowResponseData {
                    following: user_id,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowResponseData {
    pub following: i64,
}
