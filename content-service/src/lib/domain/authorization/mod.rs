pub mod errors;
pub mod evaluator;
pub mod models;
pub mod ports;

pub use errors::AuthorizationError;
pub use evaluator::AuthorizationEvaluator;
pub use models::Role;
pub use models::RoleKey;
