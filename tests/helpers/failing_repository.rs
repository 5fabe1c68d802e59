//! A user repository whose list writes can be switched to fail

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use GatherUp::database::{DatabaseService, ListWrite, MemoryStore, UserRepository};
use GatherUp::models::{User, UserChanges, UserList};
use GatherUp::utils::errors::{GatherError, Result};

pub struct FailingUserRepository {
    inner: MemoryStore,
    fail_list_writes: AtomicBool,
}

impl FailingUserRepository {
    pub fn new(inner: MemoryStore) -> Self {
        Self { inner, fail_list_writes: AtomicBool::new(false) }
    }

    pub fn fail_list_writes(&self, fail: bool) {
        self.fail_list_writes.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.fail_list_writes.load(Ordering::SeqCst) {
            return Err(GatherError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// A store whose events and groups work normally but whose user list writes can fail
pub fn failing_database() -> (DatabaseService, Arc<FailingUserRepository>) {
    let store = MemoryStore::new();
    let users = Arc::new(FailingUserRepository::new(store.clone()));
    let db = DatabaseService::from_parts(users.clone(), Arc::new(store.clone()), Arc::new(store));
    (db, users)
}

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        UserRepository::insert(&self.inner, user).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        UserRepository::find_by_id(&self.inner, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        UserRepository::find_many(&self.inner, ids).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        UserRepository::list(&self.inner, limit, offset).await
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>> {
        UserRepository::update(&self.inner, id, changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        UserRepository::delete(&self.inner, id).await
    }

    async fn add_to_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        self.check()?;
        self.inner.add_to_list(id, list, value).await
    }

    async fn remove_from_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        self.check()?;
        self.inner.remove_from_list(id, list, value).await
    }

    async fn remove_from_all(&self, list: UserList, value: Uuid) -> Result<u64> {
        self.check()?;
        self.inner.remove_from_all(list, value).await
    }

    async fn count(&self) -> Result<i64> {
        UserRepository::count(&self.inner).await
    }
}
