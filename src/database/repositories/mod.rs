//! Database repositories module
//!
//! Each collection is reached through a repository trait so the services can
//! run against PostgreSQL or the in-memory store. Relationship lists are
//! edited with set semantics: add-if-absent and remove-if-present, one
//! document per call, with no cross-document transaction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Event, Group, UpdateEventRequest, UpdateGroupRequest, User, UserChanges, UserList};
use crate::utils::errors::Result;

pub mod user;
pub mod group;
pub mod event;
pub mod memory;

// Re-export repositories
pub use user::PgUserRepository;
pub use group::PgGroupRepository;
pub use event::PgEventRepository;
pub use memory::MemoryStore;

/// Outcome of a single set-insert or set-remove on a relationship list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWrite {
    /// The list changed
    Modified,
    /// The document exists but the value was already present (insert) or absent (remove)
    Unchanged,
    /// No document with that id
    Missing,
}

impl ListWrite {
    pub fn is_modified(self) -> bool {
        self == ListWrite::Modified
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fetch the users with the given ids; unknown ids are skipped
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;

    /// Returns `None` when no user has this id
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>>;

    /// Returns whether a document was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn add_to_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite>;

    async fn remove_from_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite>;

    /// Pull `value` from `list` on every user; returns the number of users changed
    async fn remove_from_all(&self, list: UserList, value: Uuid) -> Result<u64>;

    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Event>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>>;

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Event>>;

    async fn update(&self, id: Uuid, request: &UpdateEventRequest) -> Result<Option<Event>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite>;

    async fn remove_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite>;

    /// Pull `user_id` from every event's participants
    async fn remove_participant_everywhere(&self, user_id: Uuid) -> Result<u64>;

    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn insert(&self, group: &Group) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>>;

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Group>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Group>>;

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Group>>;

    async fn update(&self, id: Uuid, request: &UpdateGroupRequest) -> Result<Option<Group>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite>;

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite>;

    /// Pull `user_id` from every group's members
    async fn remove_member_everywhere(&self, user_id: Uuid) -> Result<u64>;

    async fn count(&self) -> Result<i64>;
}
