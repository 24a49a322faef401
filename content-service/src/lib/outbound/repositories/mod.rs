use std::time::Duration;

pub mod comment;
pub mod post;
pub mod role;
pub mod user;

pub use comment::PostgresCommentRepository;
pub use post::PostgresPostRepository;
pub use role::PostgresRoleRepository;
pub use user::PostgresUserRepository;

/// Upper bound on any single store operation. An elapsed timeout fails the
/// call; nothing is retried here.
pub(crate) const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
