//! Database service layer
//!
//! Bundles the three collection handles that every service receives
//! explicitly, whichever backend provides them.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{Settings, StorageBackend};
use crate::database::connection::{self, create_pool, DatabasePool};
use crate::database::repositories::{
    EventRepository, GroupRepository, MemoryStore, PgEventRepository, PgGroupRepository,
    PgUserRepository, UserRepository,
};
use crate::utils::errors::GatherError;

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub events: Arc<dyn EventRepository>,
    pool: Option<DatabasePool>,
}

/// Document counts per collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionStats {
    pub users: i64,
    pub events: i64,
    pub groups: i64,
}

impl DatabaseService {
    /// PostgreSQL-backed collections sharing one pool
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            groups: Arc::new(PgGroupRepository::new(pool.clone())),
            events: Arc::new(PgEventRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// All collections in process memory
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            events: Arc::new(store),
            pool: None,
        }
    }

    /// Assemble from individual repositories
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        groups: Arc<dyn GroupRepository>,
    ) -> Self {
        Self { users, groups, events, pool: None }
    }

    /// Connect to the backend named in the settings, running migrations when asked
    pub async fn connect(settings: &Settings) -> Result<Self, GatherError> {
        match settings.database.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on shutdown");
                Ok(Self::in_memory())
            }
            StorageBackend::Postgres => {
                let pool = create_pool(&settings.database).await?;
                if settings.database.run_migrations {
                    connection::run_migrations(&pool).await?;
                }
                Ok(Self::postgres(pool))
            }
        }
    }

    /// Check that the backing store answers
    pub async fn health_check(&self) -> Result<(), GatherError> {
        match &self.pool {
            Some(pool) => connection::health_check(pool).await,
            None => self.users.count().await.map(|_| ()),
        }
    }

    /// Get document counts
    pub async fn stats(&self) -> Result<CollectionStats, GatherError> {
        Ok(CollectionStats {
            users: self.users.count().await?,
            events: self.events.count().await?,
            groups: self.groups.count().await?,
        })
    }
}
