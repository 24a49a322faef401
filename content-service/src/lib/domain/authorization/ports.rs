use async_trait::async_trait;

use crate::authorization::errors::AuthorizationError;
use crate::authorization::models::Role;
use crate::authorization::models::RoleKey;

/// Read-only lookup of role reference data.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Retrieve a role by key.
    ///
    /// # Returns
    /// Optional role (None if the key is not configured)
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    /// * `Timeout` - Lookup exceeded the per-call bound
    async fn find_by_key(&self, key: RoleKey) -> Result<Option<Role>, AuthorizationError>;
}
