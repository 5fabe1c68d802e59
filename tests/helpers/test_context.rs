//! Test context for unified test setup
//!
//! Wires the services over an in-memory store, or over any store handle a
//! test provides, with settings suitable for tests.

use std::sync::Once;

use axum::Router;
use uuid::Uuid;
use GatherUp::api::{build_router, AppState};
use GatherUp::config::{Settings, StorageBackend};
use GatherUp::database::DatabaseService;
use GatherUp::models::{Event, Group, User};
use GatherUp::services::ServiceFactory;

use super::test_data::{event_request, group_request, profile, unique_email};

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("GatherUp=debug")
            .with_test_writer()
            .try_init();
    });
}

pub struct TestContext {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Settings,
}

impl TestContext {
    /// Context over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_db(DatabaseService::in_memory())
    }

    /// Context over the given store handle
    pub fn with_db(db: DatabaseService) -> Self {
        init_test_logging();

        let settings = Self::test_settings();
        let services = ServiceFactory::new(db.clone(), &settings);
        Self { db, services, settings }
    }

    pub fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.backend = StorageBackend::Memory;
        settings.auth.secret_key = "integration-test-secret".to_string();
        settings.logging.level = "debug".to_string();
        settings
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(self.services.clone(), self.db.clone()))
    }

    /// Insert a user directly, skipping password hashing
    pub async fn user(&self) -> User {
        let user = User::new(unique_email(), "not-a-real-hash".to_string(), profile());
        self.db.users.insert(&user).await.expect("insert user");
        user
    }

    pub async fn event(&self, creator_id: Uuid, max_participants: i32) -> Event {
        self.services
            .event_service
            .create_event(creator_id, event_request(max_participants))
            .await
            .expect("create event")
    }

    pub async fn group(&self, creator_id: Uuid, is_private: bool, max_participants: i32) -> Group {
        self.services
            .group_service
            .create_group(creator_id, group_request(is_private, max_participants))
            .await
            .expect("create group")
    }

    pub async fn reload_user(&self, id: Uuid) -> User {
        self.db.users.find_by_id(id).await.expect("load user").expect("user exists")
    }

    pub async fn reload_event(&self, id: Uuid) -> Event {
        self.db.events.find_by_id(id).await.expect("load event").expect("event exists")
    }

    pub async fn reload_group(&self, id: Uuid) -> Group {
        self.db.groups.find_by_id(id).await.expect("load group").expect("group exists")
    }
}
