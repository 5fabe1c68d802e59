//! HTTP interface
//!
//! JSON endpoints over the services. Handlers stay thin: extract, call one
//! service operation, shape the response.

pub mod auth;
pub mod error;
pub mod events;
pub mod extract;
pub mod groups;
pub mod health;
pub mod routes;
pub mod users;

pub use auth::CurrentUser;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use routes::build_router;

use crate::database::DatabaseService;
use crate::services::ServiceFactory;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub db: DatabaseService,
}

impl AppState {
    pub fn new(services: ServiceFactory, db: DatabaseService) -> Self {
        Self { services, db }
    }
}
