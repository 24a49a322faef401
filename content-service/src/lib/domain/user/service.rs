use std::sync::Arc;

use chrono::Duration;

use crate::user::errors::UserError;
use crate::user::models::Identity;
use crate::user::models::NewUser;
use crate::user::models::RegisterUserCommand;
use crate::user::models::RegisteredUser;
use crate::user::models::UserId;
use crate::user::ports::Notifier;
use crate::user::ports::Template;
use crate::user::ports::UserCache;
use crate::user::ports::UserRepository;

/// Registration parameters fixed at startup.
#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    /// Validity window of an invitation token
    pub invite_ttl: Duration,
    /// Base URL the activation link is built from
    pub activation_base_url: String,
    /// Suppress real notification delivery outside production
    pub sandbox: bool,
}

/// Domain service for identity resolution and the registration workflow.
///
/// Resolution is cache-aside: the cache is consulted first and trusted as-is
/// on a hit; the store is authoritative on a miss. Registration is the one
/// multi-step workflow with a compensating action.
pub struct UserService<UR, UC, NT>
where
    UR: UserRepository,
    UC: UserCache,
    NT: Notifier,
{
    repository: Arc<UR>,
    cache: Arc<UC>,
    notifier: Arc<NT>,
    password_hasher: auth::PasswordHasher,
    cache_enabled: bool,
    registration: RegistrationSettings,
}

impl<UR, UC, NT> UserService<UR, UC, NT>
where
    UR: UserRepository,
    UC: UserCache,
    NT: Notifier,
{
    pub fn new(
        repository: Arc<UR>,
        cache: Arc<UC>,
        notifier: Arc<NT>,
        cache_enabled: bool,
        registration: RegistrationSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            notifier,
            password_hasher: auth::PasswordHasher::new(),
            cache_enabled,
            registration,
        }
    }

    /// Register a new account: hash the password, persist the user together
    /// with the invitation-token digest, then dispatch the welcome
    /// notification carrying the plain token.
    ///
    /// If the notification fails after the user was committed, the user row
    /// is deleted again (compensation) and the notification error is
    /// returned. A failed compensating delete is logged but never changes
    /// the caller-visible outcome: this branch always reports failure.
    ///
    /// # Errors
    /// * `DuplicateUsername` / `DuplicateEmail` - Fail fast, nothing committed
    /// * `Notification` - Dispatch failed; the account no longer exists
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn register(&self, command: RegisterUserCommand) -> Result<RegisteredUser, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let invite = auth::invite::generate();

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let identity = self
            .repository
            .create_and_invite(user, &invite.hash, self.registration.invite_ttl)
            .await?;

        let activation_url = format!(
            "{}/confirm/{}",
            self.registration.activation_base_url, invite.plain
        );
        let data = serde_json::json!({
            "username": identity.username.as_str(),
            "activation_url": activation_url,
        });

        if let Err(e) = self
            .notifier
            .send(
                Template::UserWelcome,
                identity.username.as_str(),
                identity.email.as_str(),
                data,
                self.registration.sandbox,
            )
            .await
        {
            tracing::error!(
                user_id = %identity.id,
                error = %e,
                "Welcome notification failed, rolling back registration"
            );

            if let Err(delete_err) = self.repository.delete(identity.id).await {
                tracing::error!(
                    user_id = %identity.id,
                    error = %delete_err,
                    "Compensating delete failed"
                );
            }

            return Err(UserError::Notification(e));
        }

        Ok(RegisteredUser {
            identity,
            plain_invite_token: invite.plain,
        })
    }

    /// Activate an account by its plain invitation token.
    ///
    /// The presented token is hashed and matched against stored digests;
    /// never-existed, expired, and already-used tokens are indistinguishable
    /// to the caller.
    ///
    /// # Errors
    /// * `InvitationNotFound` - No live invitation matches the token
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn activate(&self, plain_token: &str) -> Result<(), UserError> {
        let token_hash = auth::invite::hash_of(plain_token);
        self.repository.activate_by_token_hash(&token_hash).await
    }

    /// Resolve a subject id to its identity, cache first.
    ///
    /// A cache hit short-circuits the store entirely. Cache failures on
    /// either path are advisory: a read error falls through to the store, a
    /// population error is swallowed. Only store errors fail the call.
    ///
    /// # Errors
    /// * `NotFound` - No such user in the store
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn resolve(&self, id: UserId) -> Result<Identity, UserError> {
        if !self.cache_enabled {
            return self.get_user(id).await;
        }

        match self.cache.get(id).await {
            Ok(Some(identity)) => return Ok(identity),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Cache read failed, falling back to store");
            }
        }

        let identity = self.get_user(id).await?;

        if let Err(e) = self.cache.set(&identity).await {
            tracing::warn!(user_id = %id, error = %e, "Cache population failed");
        }

        Ok(identity)
    }

    /// Fetch an identity straight from the store.
    ///
    /// # Errors
    /// * `NotFound` - No such user
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn get_user(&self, id: UserId) -> Result<Identity, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))
    }

    /// Record a follow relationship.
    ///
    /// # Errors
    /// * `AlreadyFollowing` - The relationship already exists
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn follow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        self.repository.follow(follower, user).await
    }

    /// Remove a follow relationship. Idempotent: removing an absent
    /// relationship succeeds.
    ///
    /// # Errors
    /// * `DatabaseError` / `Timeout` - Store failure
    pub async fn unfollow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        self.repository.unfollow(follower, user).await
    }
}
