//! In-memory store
//!
//! Backs all three collections with maps behind one lock. Every call is
//! atomic on its own, as a document store would be; nothing spans calls.
//! Used for local runs (`database.backend = "memory"`) and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventRepository, GroupRepository, ListWrite, UserRepository};
use crate::models::{Event, Group, UpdateEventRequest, UpdateGroupRequest, User, UserChanges, UserList};
use crate::utils::errors::{GatherError, Result};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    events: HashMap<Uuid, Event>,
    groups: HashMap<Uuid, Group>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn set_insert(list: &mut Vec<Uuid>, value: Uuid) -> ListWrite {
    if list.contains(&value) {
        ListWrite::Unchanged
    } else {
        list.push(value);
        ListWrite::Modified
    }
}

fn set_remove(list: &mut Vec<Uuid>, value: Uuid) -> ListWrite {
    let before = list.len();
    list.retain(|id| *id != value);
    if list.len() == before {
        ListWrite::Unchanged
    } else {
        ListWrite::Modified
    }
}

fn page<T>(items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

fn pick<T: Clone>(map: &HashMap<Uuid, T>, ids: &[Uuid]) -> Vec<T> {
    ids.iter().filter_map(|id| map.get(id).cloned()).collect()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut db = self.inner.write().await;
        if db.users.values().any(|u| u.email == user.email) {
            return Err(GatherError::EmailTaken { email: user.email.clone() });
        }
        db.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(pick(&self.inner.read().await.users, ids))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page(users, limit, offset))
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>> {
        let mut db = self.inner.write().await;
        if let Some(email) = &changes.email {
            if db.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(GatherError::EmailTaken { email: email.clone() });
            }
        }
        Ok(db.users.get_mut(&id).map(|user| {
            user.apply(changes);
            user.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn add_to_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.users.get_mut(&id) {
            Some(user) => {
                let outcome = set_insert(user.list_mut(list), value);
                if outcome.is_modified() {
                    user.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_from_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.users.get_mut(&id) {
            Some(user) => {
                let outcome = set_remove(user.list_mut(list), value);
                if outcome.is_modified() {
                    user.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_from_all(&self, list: UserList, value: Uuid) -> Result<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for user in db.users.values_mut() {
            if set_remove(user.list_mut(list), value).is_modified() {
                user.updated_at = Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.users.len() as i64)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.inner.write().await.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Event>> {
        Ok(pick(&self.inner.read().await.events, ids))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.inner.read().await.events.values().cloned().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(page(events, limit, offset))
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Event>> {
        let db = self.inner.read().await;
        let mut events: Vec<Event> = db
            .events
            .values()
            .filter(|e| e.creator_id == creator_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn update(&self, id: Uuid, request: &UpdateEventRequest) -> Result<Option<Event>> {
        let mut db = self.inner.write().await;
        Ok(db.events.get_mut(&id).map(|event| {
            event.apply(request);
            event.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.write().await.events.remove(&id).is_some())
    }

    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.events.get_mut(&id) {
            Some(event) => {
                let outcome = set_insert(&mut event.participants, user_id);
                if outcome.is_modified() {
                    event.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.events.get_mut(&id) {
            Some(event) => {
                let outcome = set_remove(&mut event.participants, user_id);
                if outcome.is_modified() {
                    event.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_participant_everywhere(&self, user_id: Uuid) -> Result<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for event in db.events.values_mut() {
            if set_remove(&mut event.participants, user_id).is_modified() {
                event.updated_at = Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.events.len() as i64)
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn insert(&self, group: &Group) -> Result<()> {
        self.inner.write().await.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>> {
        Ok(self.inner.read().await.groups.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Group>> {
        Ok(pick(&self.inner.read().await.groups, ids))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Group>> {
        let mut groups: Vec<Group> = self.inner.read().await.groups.values().cloned().collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(page(groups, limit, offset))
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Group>> {
        let db = self.inner.read().await;
        let mut groups: Vec<Group> = db
            .groups
            .values()
            .filter(|g| g.creator_id == creator_id)
            .cloned()
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn update(&self, id: Uuid, request: &UpdateGroupRequest) -> Result<Option<Group>> {
        let mut db = self.inner.write().await;
        Ok(db.groups.get_mut(&id).map(|group| {
            group.apply(request);
            group.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.inner.write().await.groups.remove(&id).is_some())
    }

    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.groups.get_mut(&id) {
            Some(group) => {
                let outcome = set_insert(&mut group.members, user_id);
                if outcome.is_modified() {
                    group.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let mut db = self.inner.write().await;
        Ok(match db.groups.get_mut(&id) {
            Some(group) => {
                let outcome = set_remove(&mut group.members, user_id);
                if outcome.is_modified() {
                    group.updated_at = Utc::now();
                }
                outcome
            }
            None => ListWrite::Missing,
        })
    }

    async fn remove_member_everywhere(&self, user_id: Uuid) -> Result<u64> {
        let mut db = self.inner.write().await;
        let mut changed = 0;
        for group in db.groups.values_mut() {
            if set_remove(&mut group.members, user_id).is_modified() {
                group.updated_at = Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.groups.len() as i64)
    }
}
