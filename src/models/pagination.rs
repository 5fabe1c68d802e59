//! Pagination parameters for list operations

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::utils::errors::{GatherError, Result};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageRequest {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit: Some(limit), offset: Some(offset) }
    }

    /// Resolve to `(limit, offset)`, applying the configured default and ceiling
    pub fn resolve(&self, config: &PaginationConfig) -> Result<(i64, i64)> {
        let limit = self.limit.unwrap_or(config.default_limit);
        let offset = self.offset.unwrap_or(0);

        if limit < 1 || limit > config.max_limit {
            return Err(GatherError::InvalidInput(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }
        if offset < 0 {
            return Err(GatherError::InvalidInput("offset must not be negative".to_string()));
        }
        Ok((limit, offset))
    }
}
