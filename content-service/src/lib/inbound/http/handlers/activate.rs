use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<ApiSuccess<ActivateResponseData>, ApiError> {
    state
        .user_service
        .activate(&token)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                ActivateResponseData {
                    message: "user activated".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivateResponseData {
    pub message: String,
}
