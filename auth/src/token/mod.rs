mod authenticator;
mod claims;
mod errors;

pub use authenticator::TokenAuthenticator;
pub use claims::Claims;
pub use errors::TokenError;
