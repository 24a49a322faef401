use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Registered JWT claims carried by a bearer token.
///
/// All fields are mandatory: a token missing any of them never validates.
/// The subject is the numeric user identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,
}

impl Claims {
    /// Build claims for a subject with an expiry `ttl` from now.
    ///
    /// # Arguments
    /// * `subject` - Numeric user identifier
    /// * `ttl` - Validity window starting now
    /// * `issuer` - Configured issuer value
    /// * `audience` - Configured audience value
    pub fn for_subject(subject: i64, ttl: Duration, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();

        Self {
            sub: subject,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
        }
    }
}
