use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::UserId;

/// Middleware that validates bearer tokens and resolves the acting identity.
///
/// The resolved `Identity` is inserted into request extensions; handlers
/// behind this middleware can rely on it being present. A token whose subject
/// no longer exists is treated the same as an invalid token.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let claims = state.token_authenticator.validate(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        unauthorized("Invalid or expired token")
    })?;

    let identity = state
        .user_service
        .resolve(UserId(claims.sub))
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(subject = claims.sub, "Token subject no longer exists");
                unauthorized("Invalid or expired token")
            }
            _ => {
                tracing::error!(subject = claims.sub, error = %e, "Identity resolution failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Identity resolution failed" })),
                )
                    .into_response()
            }
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Middleware guarding operational endpoints with static credentials.
pub async fn basic_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthorized_basic)?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(unauthorized_basic)?;

    let decoded = BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(unauthorized_basic)?;

    let (user, password) = decoded.split_once(':').ok_or_else(unauthorized_basic)?;

    if user != state.ops_user || password != state.ops_password {
        return Err(unauthorized_basic());
    }

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": message })),
    )
        .into_response()
}

fn unauthorized_basic() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(http::header::WWW_AUTHENTICATE, "Basic realm=\"restricted\"")],
        Json(json!({ "error": "Unauthorized" })),
    )
        .into_response()
}
