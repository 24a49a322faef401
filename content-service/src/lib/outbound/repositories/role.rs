use async_trait::async_trait;
use sqlx::PgPool;

use super::QUERY_TIMEOUT;
use crate::authorization::errors::AuthorizationError;
use crate::authorization::models::Role;
use crate::authorization::models::RoleKey;
use crate::authorization::ports::RoleRepository;

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    key: String,
    level: i32,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_by_key(&self, key: RoleKey) -> Result<Option<Role>, AuthorizationError> {
        let query = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT key, level
            FROM roles
            WHERE key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool);

        let row = tokio::time::timeout(QUERY_TIMEOUT, query)
            .await
            .map_err(|_| AuthorizationError::Timeout)?
            .map_err(|e| AuthorizationError::DatabaseError(e.to_string()))?;

        row.map(|r| {
            Ok(Role {
                key: r.key.parse()?,
                level: r.level,
            })
        })
        .transpose()
    }
}
