use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;
use crate::user::models::Identity;
use crate::user::models::UserId;

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<ApiSuccess<GetUserResponseData>, ApiError> {
    state
        .user_service
        .resolve(UserId(user_id))
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetUserResponseData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Identity> for GetUserResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.as_i64(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role.key.as_str().to_string(),
            active: identity.active,
            created_at: identity.created_at,
        }
    }
}
