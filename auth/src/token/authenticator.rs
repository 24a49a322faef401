use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and validates signed bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a single symmetric secret. Validation
/// accepts exactly that algorithm: tokens carrying any other `alg` header
/// (including `none`) are rejected, closing the algorithm-confusion hole.
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    audience: String,
    issuer: String,
}

impl TokenAuthenticator {
    /// Create a new token authenticator.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret (at least 256 bits for HS256)
    /// * `audience` - Audience value stamped into and required of every token
    /// * `issuer` - Issuer value stamped into and required of every token
    pub fn new(secret: &[u8], audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Issue a signed token for a subject, valid for `ttl` from now.
    ///
    /// CPU-bound signing only; no side effects.
    ///
    /// # Errors
    /// * `SigningFailed` - Token serialization or signing failed
    pub fn issue(&self, subject: i64, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims::for_subject(subject, ttl, &self.issuer, &self.audience);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Validate a token and return its claims.
    ///
    /// Rejects unless the signature verifies under the configured secret,
    /// the algorithm is exactly the configured one, `exp` is present and in
    /// the future, and `aud`/`iss` match the configured values. Failed
    /// validation never yields partially trusted claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Expiration claim has passed
    /// * `InvalidToken` - Any other validation failure
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        // Validation::new pins the algorithm allow-list to exactly `algorithm`.
        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}
