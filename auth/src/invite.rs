use sha2::Digest;
use sha2::Sha256;
use uuid::Uuid;

/// A freshly generated invitation token.
///
/// Only `hash` is ever persisted; `plain` travels to the recipient once and
/// is presented back at activation time.
#[derive(Debug, Clone)]
pub struct InviteToken {
    pub plain: String,
    pub hash: String,
}

/// Generate a random invitation token with its storage digest.
pub fn generate() -> InviteToken {
    let plain = Uuid::new_v4().to_string();
    let hash = hash_of(&plain);

    InviteToken { plain, hash }
}

/// SHA-256 hex digest of a plain invitation token.
///
/// Deterministic: the activation lookup recomputes this over the presented
/// token and matches it against the stored digest.
pub fn hash_of(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_matching_digest() {
        let token = generate();

        assert!(!token.plain.is_empty());
        assert_eq!(token.hash, hash_of(&token.plain));
        // SHA-256 hex digest is always 64 characters.
        assert_eq!(token.hash.len(), 64);
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(hash_of("abc"), hash_of("abc"));
        assert_ne!(hash_of("abc"), hash_of("abd"));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(generate().plain, generate().plain);
    }
}
