use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::user::errors::CacheError;
use crate::user::models::Identity;
use crate::user::models::UserId;

/// Process-local identity cache.
///
/// Stores resolved identities verbatim, keyed by subject id. No TTL or
/// eviction: the resolver's read-through population is the only write path,
/// and the store stays authoritative.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserCache {
    entries: Arc<RwLock<HashMap<UserId, Identity>>>,
}

impl InMemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::user::ports::UserCache for InMemoryUserCache {
    async fn get(&self, id: UserId) -> Result<Option<Identity>, CacheError> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn set(&self, identity: &Identity) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(identity.id, identity.clone());
        Ok(())
    }
}
