use std::sync::Arc;

use crate::authorization::errors::AuthorizationError;
use crate::authorization::models::RoleKey;
use crate::authorization::ports::RoleRepository;
use crate::user::models::Identity;
use crate::user::models::UserId;

/// Decides whether an authenticated user may perform a restricted mutation.
///
/// Ownership always suffices; otherwise the actor's role level is compared
/// against the per-operation required role. The required role is a caller
/// parameter, not a property of the resource.
pub struct AuthorizationEvaluator<RR>
where
    RR: RoleRepository,
{
    roles: Arc<RR>,
}

impl<RR> AuthorizationEvaluator<RR>
where
    RR: RoleRepository,
{
    pub fn new(roles: Arc<RR>) -> Self {
        Self { roles }
    }

    /// Allow/deny a mutation of a resource owned by `owner`.
    ///
    /// # Arguments
    /// * `actor` - The resolved acting identity
    /// * `owner` - Owner of the target resource
    /// * `required` - Minimum role for non-owners, per operation
    ///
    /// # Errors
    /// * `RoleNotConfigured` - The required role does not exist; this is
    ///   misconfiguration, not a deny
    /// * `DatabaseError` / `Timeout` - Role lookup failed
    pub async fn may_mutate(
        &self,
        actor: &Identity,
        owner: UserId,
        required: RoleKey,
    ) -> Result<bool, AuthorizationError> {
        if owner == actor.id {
            return Ok(true);
        }

        let required_role = self
            .roles
            .find_by_key(required)
            .await?
            .ok_or_else(|| AuthorizationError::RoleNotConfigured(required.to_string()))?;

        Ok(actor.role.level >= required_role.level)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::authorization::models::Role;
    use crate::user::models::EmailAddress;
    use crate::user::models::Username;

    mock! {
        pub TestRoleRepository {}

        #[async_trait]
        impl RoleRepository for TestRoleRepository {
            async fn find_by_key(&self, key: RoleKey) -> Result<Option<Role>, AuthorizationError>;
        }
    }

    fn identity(id: i64, role: Role) -> Identity {
        Identity {
            id: UserId(id),
            username: Username::new(format!("user{}", id)).unwrap(),
            email: EmailAddress::new(format!("user{}@example.com", id)).unwrap(),
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn lowest_role() -> Role {
        Role {
            key: RoleKey::User,
            level: 1,
        }
    }

    #[tokio::test]
    async fn test_owner_is_always_allowed() {
        let mut roles = MockTestRoleRepository::new();
        // Ownership short-circuits; the role store is never consulted.
        roles.expect_find_by_key().times(0);

        let evaluator = AuthorizationEvaluator::new(Arc::new(roles));
        let actor = identity(1, lowest_role());

        let allowed = evaluator
            .may_mutate(&actor, UserId(1), RoleKey::Admin)
            .await
            .unwrap();
        assert!(allowed);
    }

    #[tokio::test]
    async fn test_non_owner_below_required_level_is_denied() {
        let mut roles = MockTestRoleRepository::new();
        roles
            .expect_find_by_key()
            .with(eq(RoleKey::Moderator))
            .times(1)
            .returning(|_| {
                Ok(Some(Role {
                    key: RoleKey::Moderator,
                    level: 2,
                }))
            });

        let evaluator = AuthorizationEvaluator::new(Arc::new(roles));
        let actor = identity(1, lowest_role());

        let allowed = evaluator
            .may_mutate(&actor, UserId(2), RoleKey::Moderator)
            .await
            .unwrap();
        assert!(!allowed);
    }

    #[tokio::test]
    async fn test_non_owner_at_or_above_required_level_is_allowed() {
        let mut roles = MockTestRoleRepository::new();
        roles.expect_find_by_key().times(2).returning(|_| {
            Ok(Some(Role {
                key: RoleKey::Moderator,
                level: 2,
            }))
        });

        let evaluator = AuthorizationEvaluator::new(Arc::new(roles));

        let moderator = identity(
            1,
            Role {
                key: RoleKey::Moderator,
                level: 2,
            },
        );
        let admin = identity(
            2,
            Role {
                key: RoleKey::Admin,
                level: 3,
            },
        );

        assert!(evaluator
            .may_mutate(&moderator, UserId(9), RoleKey::Moderator)
            .await
            .unwrap());
        assert!(evaluator
            .may_mutate(&admin, UserId(9), RoleKey::Moderator)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_missing_required_role_is_an_error_not_a_deny() {
        let mut roles = MockTestRoleRepository::new();
        roles
            .expect_find_by_key()
            .times(1)
            .returning(|_| Ok(None));

        let evaluator = AuthorizationEvaluator::new(Arc::new(roles));
        let actor = identity(1, lowest_role());

        let result = evaluator.may_mutate(&actor, UserId(2), RoleKey::Admin).await;
        assert!(matches!(
            result,
            Err(AuthorizationError::RoleNotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn test_role_lookup_failure_propagates() {
        let mut roles = MockTestRoleRepository::new();
        roles
            .expect_find_by_key()
            .times(1)
            .returning(|_| Err(AuthorizationError::DatabaseError("down".to_string())));

        let evaluator = AuthorizationEvaluator::new(Arc::new(roles));
        let actor = identity(1, lowest_role());

        let result = evaluator.may_mutate(&actor, UserId(2), RoleKey::Admin).await;
        assert!(matches!(result, Err(AuthorizationError::DatabaseError(_))));
    }
}
