use std::sync::Arc;

use auth::TokenAuthenticator;
use content_service::config::Config;
use content_service::domain::comment::service::CommentService;
use content_service::domain::post::service::PostService;
use content_service::domain::user::service::RegistrationSettings;
use content_service::domain::user::service::UserService;
use content_service::inbound::http::router::create_router;
use content_service::inbound::http::router::AppState;
use content_service::outbound::cache::InMemoryUserCache;
use content_service::outbound::notifier::MailApiNotifier;
use content_service::outbound::repositories::PostgresCommentRepository;
use content_service::outbound::repositories::PostgresPostRepository;
use content_service::outbound::repositories::PostgresRoleRepository;
use content_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "content_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "content-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = %config.environment,
        http_port = config.server.http_port,
        cache_enabled = config.cache.enabled,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_authenticator = Arc::new(TokenAuthenticator::new(
        config.auth.secret.as_bytes(),
        config.auth.audience.clone(),
        config.auth.issuer.clone(),
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let post_repository = Arc::new(PostgresPostRepository::new(pg_pool.clone()));
    let comment_repository = Arc::new(PostgresCommentRepository::new(pg_pool.clone()));
    let role_repository = Arc::new(PostgresRoleRepository::new(pg_pool));
    let user_cache = Arc::new(InMemoryUserCache::new());
    let notifier = Arc::new(MailApiNotifier::new(
        config.mail.endpoint.clone(),
        config.mail.api_key.clone(),
        config.mail.from_email.clone(),
    ));

    let registration = RegistrationSettings {
        invite_ttl: chrono::Duration::hours(config.mail.invite_ttl_hours),
        activation_base_url: config.mail.activation_base_url.clone(),
        sandbox: !config.is_production(),
    };

    let user_service = Arc::new(UserService::new(
        user_repository,
        user_cache,
        notifier,
        config.cache.enabled,
        registration,
    ));
    let post_service = Arc::new(PostService::new(post_repository.clone(), role_repository));
    let comment_service = Arc::new(CommentService::new(comment_repository, post_repository));

    let state = AppState {
        user_service,
        post_service,
        comment_service,
        token_authenticator,
        token_ttl: chrono::Duration::hours(config.auth.token_ttl_hours),
        ops_user: config.auth.basic_user.clone(),
        ops_password: config.auth.basic_password.clone(),
        environment: config.environment.clone(),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
