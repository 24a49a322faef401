use std::sync::Arc;
use std::time::Duration;

use auth::TokenAuthenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate::activate;
use super::handlers::create_comment::create_comment;
use super::handlers::create_post::create_post;
use super::handlers::delete_post::delete_post;
use super::handlers::feed::feed;
use super::handlers::follow_user::follow_user;
use super::handlers::get_post::get_post;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::issue_token::issue_token;
use super::handlers::register::register;
use super::handlers::unfollow_user::unfollow_user;
use super::handlers::update_post::update_post;
use super::middleware::authenticate as auth_middleware;
use super::middleware::basic_auth as basic_auth_middleware;
use crate::domain::comment::service::CommentService;
use crate::domain::post::service::PostService;
use crate::domain::user::service::UserService;
use crate::outbound::cache::InMemoryUserCache;
use crate::outbound::notifier::MailApiNotifier;
use crate::outbound::repositories::PostgresCommentRepository;
use crate::outbound::repositories::PostgresPostRepository;
use crate::outbound::repositories::PostgresRoleRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository, InMemoryUserCache, MailApiNotifier>>,
    pub post_service: Arc<PostService<PostgresPostRepository, PostgresRoleRepository>>,
    pub comment_service: Arc<CommentService<PostgresCommentRepository, PostgresPostRepository>>,
    pub token_authenticator: Arc<TokenAuthenticator>,
    pub token_ttl: chrono::Duration,
    pub ops_user: String,
    pub ops_password: String,
    pub environment: String,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/activate/:token", put(activate));

    let protected_routes = Router::new()
        .route("/v1/users/feed", get(feed))
        .route("/v1/users/:user_id", get(get_user))
        .route("/v1/users/:user_id/follow", put(follow_user))
        .route("/v1/users/:user_id/unfollow", put(unfollow_user))
        .route("/v1/posts", post(create_post))
        .route("/v1/posts/:post_id", get(get_post))
        .route("/v1/posts/:post_id", patch(update_post))
        .route("/v1/posts/:post_id", delete(delete_post))
        .route("/v1/posts/:post_id/comments", post(create_comment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let ops_routes = Router::new()
        .route("/v1/health", get(health))
        .route("/v1/ops/token", post(issue_token))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            basic_auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(ops_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
