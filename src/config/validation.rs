//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use tracing::warn;

use super::settings::{StorageBackend, DEFAULT_SECRET_KEY};
use super::Settings;
use crate::utils::errors::{GatherError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;
    validate_pagination_config(&settings.pagination)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(GatherError::Config("Server host is required".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.backend == StorageBackend::Memory {
        return Ok(());
    }

    if config.url.is_empty() {
        return Err(GatherError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(GatherError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GatherError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(GatherError::Config(
            "Acquire timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate token signing configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.secret_key.is_empty() {
        return Err(GatherError::Config("Auth secret key is required".to_string()));
    }

    if config.access_token_expire_minutes <= 0 {
        return Err(GatherError::Config(
            "Access token lifetime must be greater than 0".to_string(),
        ));
    }

    if config.secret_key == DEFAULT_SECRET_KEY {
        warn!("Using the development secret key; set GATHERUP_AUTH__SECRET_KEY in production");
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GatherError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GatherError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

fn validate_pagination_config(config: &super::PaginationConfig) -> Result<()> {
    if config.default_limit <= 0 || config.max_limit <= 0 {
        return Err(GatherError::Config(
            "Pagination limits must be greater than 0".to_string(),
        ));
    }

    if config.default_limit > config.max_limit {
        return Err(GatherError::Config(
            "Default page size cannot exceed the maximum".to_string(),
        ));
    }

    Ok(())
}
