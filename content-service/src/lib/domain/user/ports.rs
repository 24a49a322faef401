use async_trait::async_trait;
use chrono::Duration;

use crate::user::errors::CacheError;
use crate::user::errors::NotifierError;
use crate::user::errors::UserError;
use crate::user::models::Identity;
use crate::user::models::NewUser;
use crate::user::models::UserId;

/// Persistence operations for the user aggregate.
///
/// Each call is bounded by the adapter's per-call timeout and observes
/// request cancellation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user together with the digest of their invitation
    /// token, atomically (one store call, one transaction).
    ///
    /// # Arguments
    /// * `user` - User to create (password already hashed)
    /// * `token_hash` - SHA-256 digest of the invitation token
    /// * `ttl` - Invitation validity window
    ///
    /// # Returns
    /// The created identity (default role, inactive)
    ///
    /// # Errors
    /// * `DuplicateUsername` / `DuplicateEmail` - Uniqueness violation;
    ///   nothing was committed
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn create_and_invite(
        &self,
        user: NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<Identity, UserError>;

    /// Retrieve an identity by id.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, UserError>;

    /// Atomically find a non-expired invitation matching `token_hash`,
    /// activate the account, and consume the invitation.
    ///
    /// # Errors
    /// * `InvitationNotFound` - Covers never-existed, expired, and
    ///   already-used uniformly
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn activate_by_token_hash(&self, token_hash: &str) -> Result<(), UserError>;

    /// Remove a user row. Used by the registration compensation path.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn delete(&self, id: UserId) -> Result<(), UserError>;

    /// Record that `follower` follows `user`.
    ///
    /// # Errors
    /// * `AlreadyFollowing` - The relationship already exists
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn follow(&self, follower: UserId, user: UserId) -> Result<(), UserError>;

    /// Remove a follow relationship. Removing an absent relationship is a
    /// no-op, not an error.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    async fn unfollow(&self, follower: UserId, user: UserId) -> Result<(), UserError>;
}

/// Best-effort side cache for resolved identities.
///
/// The store stays authoritative; absence is not an error and values are
/// stored verbatim, never transformed.
#[async_trait]
pub trait UserCache: Send + Sync + 'static {
    /// Look up a cached identity.
    async fn get(&self, id: UserId) -> Result<Option<Identity>, CacheError>;

    /// Populate the cache with a freshly fetched identity.
    async fn set(&self, identity: &Identity) -> Result<(), CacheError>;
}

/// Notification template identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    UserWelcome,
}

impl Template {
    pub fn key(&self) -> &'static str {
        match self {
            Template::UserWelcome => "user-welcome",
        }
    }
}

/// Outbound notification dispatch. Opaque beyond success/failure.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Send a templated notification.
    ///
    /// # Arguments
    /// * `template` - Template to render
    /// * `recipient_name` - Display name of the recipient
    /// * `recipient_address` - Email address of the recipient
    /// * `data` - Template variables
    /// * `sandbox` - Suppress real delivery outside production
    ///
    /// # Errors
    /// * `SendFailed` / `TemplateFailed` - Dispatch failed
    async fn send(
        &self,
        template: Template,
        recipient_name: &str,
        recipient_address: &str,
        data: serde_json::Value,
        sandbox: bool,
    ) -> Result<(), NotifierError>;
}
