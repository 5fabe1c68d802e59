//! Data models module
//!
//! This module contains the canonical document shapes and request schemas
//! used throughout the application

pub mod user;
pub mod group;
pub mod event;
pub mod pagination;

// Re-export commonly used models
pub use user::{
    CreateUserRequest, LoginRequest, ProfileFields, ProfileUpdateResponse, TokenResponse,
    UpdateUserRequest, User, UserChanges, UserList, UserProfile,
};
pub use group::{CreateGroupRequest, Group, UpdateGroupRequest};
pub use event::{CreateEventRequest, Event, UpdateEventRequest};
pub use pagination::PageRequest;
