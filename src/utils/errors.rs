//! Error handling for GatherUp
//!
//! This module defines the main error type used throughout the application
//! and maps every failure onto an HTTP-style status code.

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Which side of a membership relation an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipTarget {
    Event(Uuid),
    Group(Uuid),
}

impl std::fmt::Display for MembershipTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipTarget::Event(id) => write!(f, "event {}", id),
            MembershipTarget::Group(id) => write!(f, "group {}", id),
        }
    }
}

/// Main error type for GatherUp application
#[derive(Error, Debug)]
pub enum GatherError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: Uuid },

    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: Uuid },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: Uuid },

    #[error("{0}")]
    NotFound(String),

    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    #[error("User is already a member of {target}")]
    AlreadyMember { target: MembershipTarget },

    #[error("User is not a member of {target}")]
    NotMember { target: MembershipTarget },

    #[error("Capacity reached for {target} (max {max})")]
    CapacityReached { target: MembershipTarget, max: i32 },

    #[error("Cannot lower capacity of {target} to {requested}: {current} already joined")]
    CapacityBelowMembers { target: MembershipTarget, requested: i32, current: usize },

    #[error("The creator cannot leave group {group_id}")]
    CreatorCannotLeave { group_id: Uuid },

    #[error("Group {group_id} is private")]
    PrivateGroup { group_id: Uuid },

    #[error("Partial write during {operation}: {detail}")]
    PartialWrite { operation: &'static str, detail: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed request: {message}")]
    MalformedRequest { status: StatusCode, message: String },
}

/// Result type alias for GatherUp operations
pub type Result<T> = std::result::Result<T, GatherError>;

impl GatherError {
    /// HTTP status code this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatherError::UserNotFound { .. }
            | GatherError::GroupNotFound { .. }
            | GatherError::EventNotFound { .. }
            | GatherError::NotFound(_) => StatusCode::NOT_FOUND,
            GatherError::EmailTaken { .. }
            | GatherError::AlreadyMember { .. }
            | GatherError::NotMember { .. }
            | GatherError::CapacityReached { .. }
            | GatherError::CapacityBelowMembers { .. }
            | GatherError::CreatorCannotLeave { .. } => StatusCode::CONFLICT,
            GatherError::PermissionDenied(_) | GatherError::PrivateGroup { .. } => {
                StatusCode::FORBIDDEN
            }
            GatherError::Authentication(_) | GatherError::Token(_) => StatusCode::UNAUTHORIZED,
            GatherError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatherError::MalformedRequest { status, .. } => *status,
            GatherError::Database(_)
            | GatherError::Migration(_)
            | GatherError::Config(_)
            | GatherError::ConfigLoad(_)
            | GatherError::PartialWrite { .. }
            | GatherError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to API clients
    pub fn public_message(&self) -> String {
        match self {
            GatherError::Database(_)
            | GatherError::Migration(_)
            | GatherError::Config(_)
            | GatherError::ConfigLoad(_)
            | GatherError::PasswordHash(_) => "Internal server error".to_string(),
            GatherError::PartialWrite { operation, .. } => {
                format!("Error updating related records during {}", operation)
            }
            GatherError::Token(_) => "Invalid token".to_string(),
            GatherError::Authentication(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GatherError::Database(_) => true,
            GatherError::Migration(_) => false,
            GatherError::Config(_) => false,
            GatherError::ConfigLoad(_) => false,
            GatherError::PermissionDenied(_) => false,
            GatherError::UserNotFound { .. } => false,
            GatherError::GroupNotFound { .. } => false,
            GatherError::EventNotFound { .. } => false,
            GatherError::NotFound(_) => false,
            GatherError::EmailTaken { .. } => false,
            GatherError::AlreadyMember { .. } => false,
            GatherError::NotMember { .. } => false,
            GatherError::CapacityReached { .. } => true,
            GatherError::CapacityBelowMembers { .. } => false,
            GatherError::CreatorCannotLeave { .. } => false,
            GatherError::PrivateGroup { .. } => false,
            // a dangling one-sided link can be repaired by repeating the operation
            GatherError::PartialWrite { .. } => true,
            GatherError::Authentication(_) => false,
            GatherError::Token(_) => false,
            GatherError::PasswordHash(_) => false,
            GatherError::InvalidInput(_) => false,
            GatherError::MalformedRequest { .. } => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GatherError::Database(_) => ErrorSeverity::Critical,
            GatherError::Migration(_) => ErrorSeverity::Critical,
            GatherError::Config(_) | GatherError::ConfigLoad(_) => ErrorSeverity::Critical,
            GatherError::PartialWrite { .. } => ErrorSeverity::Error,
            GatherError::PermissionDenied(_) | GatherError::PrivateGroup { .. } => ErrorSeverity::Warning,
            GatherError::Authentication(_) | GatherError::Token(_) => ErrorSeverity::Warning,
            GatherError::InvalidInput(_) | GatherError::MalformedRequest { .. } => ErrorSeverity::Info,
            GatherError::UserNotFound { .. }
            | GatherError::GroupNotFound { .. }
            | GatherError::EventNotFound { .. }
            | GatherError::NotFound(_)
            | GatherError::EmailTaken { .. }
            | GatherError::AlreadyMember { .. }
            | GatherError::NotMember { .. }
            | GatherError::CapacityReached { .. }
            | GatherError::CapacityBelowMembers { .. }
            | GatherError::CreatorCannotLeave { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
