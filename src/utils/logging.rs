//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the GatherUp application.

use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use uuid::Uuid;

use crate::config::LoggingConfig;
use crate::utils::errors::{GatherError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file appender on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "gatherup.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| GatherError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user account actions with structured data
pub fn log_user_action(user_id: Uuid, action: &str, details: Option<&str>) {
    info!(
        user_id = %user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log event management and participation actions
pub fn log_event_action(event_id: Uuid, action: &str, user_id: Uuid, details: Option<&str>) {
    info!(
        event_id = %event_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Event action performed"
    );
}

/// Log group management and membership actions
pub fn log_group_action(group_id: Uuid, action: &str, user_id: Uuid, details: Option<&str>) {
    info!(
        group_id = %group_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Group action performed"
    );
}

/// Log authentication outcomes
pub fn log_auth_event(subject: &str, action: &str, success: bool) {
    if success {
        info!(subject = subject, action = action, "Authentication event: success");
    } else {
        warn!(subject = subject, action = action, "Authentication event: failure");
    }
}

/// Log a membership write that left only one side of a relation updated
pub fn log_partial_write(operation: &str, target: &str, user_id: Uuid, error: &GatherError) {
    error!(
        operation = operation,
        target = target,
        user_id = %user_id,
        error = %error,
        "Reciprocal write failed; relation is now one-sided"
    );
}
