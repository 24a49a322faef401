use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Mint a bearer token for a subject. Guarded by the operational basic-auth
/// middleware; there is no password login surface.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(body): Json<IssueTokenRequest>,
) -> Result<ApiSuccess<IssueTokenResponseData>, ApiError> {
    state
        .token_authenticator
        .issue(body.user_id, state.token_ttl)
        .map_err(|e| ApiError::InternalServerError(e.to_string()))
        .map(|token| ApiSuccess::new(StatusCode::CREATED, IssueTokenResponseData { token }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueTokenRequest {
    user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueTokenResponseData {
    pub token: String,
}
