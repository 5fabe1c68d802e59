//! Group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{GatherError, Result};
use crate::utils::helpers::{clearable_text, optional_text, require_capacity, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub creator_id: Uuid,
    #[sqlx(rename = "member_ids")]
    pub members: Vec<Uuid>,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Build a new group; the creator is its first member
    pub fn new(creator_id: Uuid, request: CreateGroupRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            is_private: request.is_private,
            creator_id,
            members: vec![creator_id],
            max_participants: request.max_participants,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply already-validated field changes; an empty description clears it
    pub fn apply(&mut self, request: &UpdateGroupRequest) {
        if let Some(name) = &request.name {
            self.name = name.clone();
        }
        if let Some(description) = &request.description {
            self.description = optional_text(Some(description.clone()));
        }
        if let Some(is_private) = request.is_private {
            self.is_private = is_private;
        }
        if let Some(max_participants) = request.max_participants {
            self.max_participants = max_participants;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.max_participants.max(0) as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub max_participants: i32,
}

impl CreateGroupRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            name: require_text("name", &self.name)?,
            description: optional_text(self.description),
            is_private: self.is_private,
            max_participants: require_capacity(self.max_participants)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
    pub max_participants: Option<i32>,
}

impl UpdateGroupRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        let request = Self {
            name: self.name.as_deref().map(|n| require_text("name", n)).transpose()?,
            description: clearable_text(self.description),
            is_private: self.is_private,
            max_participants: self.max_participants.map(require_capacity).transpose()?,
        };

        if request.name.is_none()
            && request.description.is_none()
            && request.is_private.is_none()
            && request.max_participants.is_none()
        {
            return Err(GatherError::InvalidInput("No fields to update".to_string()));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CreateGroupRequest {
        CreateGroupRequest {
            name: "Weekend hikers".to_string(),
            description: Some("Trails every Saturday".to_string()),
            is_private: false,
            max_participants: 2,
        }
    }

    #[test]
    fn test_creator_is_first_member() {
        let creator = Uuid::new_v4();
        let group = Group::new(creator, sample_request().validate().unwrap());
        assert_eq!(group.members, vec![creator]);
        assert!(!group.is_full());
    }

    #[test]
    fn test_private_flag_defaults_to_public() {
        let request: CreateGroupRequest =
            serde_json::from_str(r#"{"name":"Chess","max_participants":4}"#).unwrap();
        assert!(!request.is_private);
    }

    #[test]
    fn test_validation() {
        let mut request = sample_request();
        request.name = "  ".to_string();
        assert!(request.validate().is_err());

        assert!(UpdateGroupRequest::default().validate().is_err());
        let update = UpdateGroupRequest { is_private: Some(true), ..Default::default() };
        assert!(update.validate().is_ok());
    }
}
