//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod group;
pub(crate) mod membership;
pub mod user;

// Re-export commonly used services
pub use auth::{AuthService, Claims};
pub use event::EventService;
pub use group::GroupService;
pub use user::UserService;

use std::collections::HashMap;

use uuid::Uuid;

use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub group_service: GroupService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one store handle
    pub fn new(db: DatabaseService, settings: &Settings) -> Self {
        let auth_service = AuthService::new(db.users.clone(), &settings.auth);
        let user_service =
            UserService::new(db.clone(), auth_service.clone(), settings.pagination.clone());
        let event_service = EventService::new(db.clone(), settings.pagination.clone());
        let group_service = GroupService::new(db, settings.pagination.clone());

        Self {
            auth_service,
            user_service,
            event_service,
            group_service,
        }
    }
}

/// Arrange fetched documents in the order their ids appear in `ids`
pub(crate) fn in_list_order<T>(ids: &[Uuid], items: Vec<T>, id_of: impl Fn(&T) -> Uuid) -> Vec<T> {
    let mut by_id: HashMap<Uuid, T> = items.into_iter().map(|item| (id_of(&item), item)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_list_order_follows_ids_and_skips_missing() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let ordered = in_list_order(&[c, a, b], vec![b, a], |id| *id);
        assert_eq!(ordered, vec![a, b]);
    }
}
