use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use sqlx::PgPool;

use super::QUERY_TIMEOUT;
use crate::authorization::models::Role;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::Identity;
use crate::user::models::NewUser;
use crate::user::models::UserId;
use crate::user::models::Username;
use crate::user::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    email: String,
    active: bool,
    created_at: DateTime<Utc>,
    role_key: String,
    role_level: i32,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = UserError;

    fn try_from(row: IdentityRow) -> Result<Self, UserError> {
        let role_key = row
            .role_key
            .parse()
            .map_err(|e| UserError::DatabaseError(format!("Corrupt role reference data: {}", e)))?;

        Ok(Identity {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            role: Role {
                key: role_key,
                level: row.role_level,
            },
            active: row.active,
            created_at: row.created_at,
        })
    }
}

fn db_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn unique_violation(e: sqlx::Error, user: &NewUser) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some("users_username_key") {
                return UserError::DuplicateUsername(user.username.as_str().to_string());
            }
            if db_err.constraint() == Some("users_email_key") {
                return UserError::DuplicateEmail(user.email.as_str().to_string());
            }
        }
    }
    db_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_and_invite(
        &self,
        user: NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<Identity, UserError> {
        let expiry = Utc::now() + ttl;

        let operation = async {
            let mut tx = self.pool.begin().await.map_err(db_error)?;

            let row = sqlx::query_as::<_, IdentityRow>(
                r#"
                WITH created AS (
                    INSERT INTO users (username, email, password_hash)
                    VALUES ($1, $2, $3)
                    RETURNING id, username, email, role_key, active, created_at
                )
                SELECT c.id, c.username, c.email, c.active, c.created_at,
                       r.key AS role_key, r.level AS role_level
                FROM created c
                JOIN roles r ON r.key = c.role_key
                "#,
            )
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| unique_violation(e, &user))?;

            sqlx::query(
                r#"
                INSERT INTO user_invitations (token_hash, user_id, expiry)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(token_hash)
            .bind(row.id)
            .bind(expiry)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            tx.commit().await.map_err(db_error)?;

            Identity::try_from(row)
        };

        tokio::time::timeout(QUERY_TIMEOUT, operation)
            .await
            .map_err(|_| UserError::Timeout("create user with invitation".to_string()))?
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Identity>, UserError> {
        let query = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT u.id, u.username, u.email, u.active, u.created_at,
                   r.key AS role_key, r.level AS role_level
            FROM users u
            JOIN roles r ON r.key = u.role_key
            WHERE u.id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| UserError::Timeout("user lookup".to_string()))?
            .map_err(db_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn activate_by_token_hash(&self, token_hash: &str) -> Result<(), UserError> {
        let operation = async {
            let mut tx = self.pool.begin().await.map_err(db_error)?;

            let result = sqlx::query(
                r#"
                UPDATE users
                SET active = TRUE
                WHERE id = (
                    SELECT user_id FROM user_invitations
                    WHERE token_hash = $1 AND expiry > now()
                )
                "#,
            )
            .bind(token_hash)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

            // Never-existed, expired, and consumed invitations all land here.
            if result.rows_affected() == 0 {
                return Err(UserError::InvitationNotFound);
            }

            sqlx::query("DELETE FROM user_invitations WHERE token_hash = $1")
                .bind(token_hash)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;

            tx.commit().await.map_err(db_error)
        };

        tokio::time::timeout(QUERY_TIMEOUT, operation)
            .await
            .map_err(|_| UserError::Timeout("account activation".to_string()))?
    }

    async fn delete(&self, id: UserId) -> Result<(), UserError> {
        let query = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool);

        let result = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| UserError::Timeout("user delete".to_string()))?
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.0));
        }

        Ok(())
    }

    async fn follow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        let query = sqlx::query(
            r#"
            INSERT INTO followers (user_id, follower_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user.0)
        .bind(follower.0)
        .execute(&self.pool);

        tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| UserError::Timeout("follow".to_string()))?
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return UserError::AlreadyFollowing(user.0);
                    }
                }
                db_error(e)
            })?;

        Ok(())
    }

    async fn unfollow(&self, follower: UserId, user: UserId) -> Result<(), UserError> {
        let query = sqlx::query(
            r#"
            DELETE FROM followers
            WHERE user_id = $1 AND follower_id = $2
            "#,
        )
        .bind(user.0)
        .bind(follower.0)
        .execute(&self.pool);

        // Removing an absent relationship is a no-op by contract.
        tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| UserError::Timeout("unfollow".to_string()))?
            .map_err(db_error)?;

        Ok(())
    }
}
