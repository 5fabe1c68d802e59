//! GatherUp backend
//!
//! A JSON backend for social events and community groups. Users register,
//! create and join events, and create and join groups; membership is kept on
//! both sides of every relation and maintained by the service layer.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GatherError, Result};

// Re-export main components for easy access
pub use api::{build_router, AppState};
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
