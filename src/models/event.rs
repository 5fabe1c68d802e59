//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{GatherError, Result};
use crate::utils::helpers::{clearable_text, optional_text, require_capacity, require_text};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub event_type: String,
    pub requirements: Option<String>,
    pub creator_id: Uuid,
    #[sqlx(rename = "participant_ids")]
    pub participants: Vec<Uuid>,
    pub max_participants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event owned by `creator_id`; the creator is not a participant
    pub fn new(creator_id: Uuid, request: CreateEventRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            date: request.date,
            location: request.location,
            event_type: request.event_type,
            requirements: request.requirements,
            creator_id,
            participants: Vec::new(),
            max_participants: request.max_participants,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply already-validated field changes; an empty text value clears its field
    pub fn apply(&mut self, request: &UpdateEventRequest) {
        if let Some(title) = &request.title {
            self.title = title.clone();
        }
        if let Some(description) = &request.description {
            self.description = optional_text(Some(description.clone()));
        }
        if let Some(date) = request.date {
            self.date = date;
        }
        if let Some(location) = &request.location {
            self.location = location.clone();
        }
        if let Some(event_type) = &request.event_type {
            self.event_type = event_type.clone();
        }
        if let Some(requirements) = &request.requirements {
            self.requirements = optional_text(Some(requirements.clone()));
        }
        if let Some(max_participants) = request.max_participants {
            self.max_participants = max_participants;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants.max(0) as usize
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub event_type: String,
    pub requirements: Option<String>,
    pub max_participants: i32,
}

impl CreateEventRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        Ok(Self {
            title: require_text("title", &self.title)?,
            description: optional_text(self.description),
            date: self.date,
            location: require_text("location", &self.location)?,
            event_type: require_text("event_type", &self.event_type)?,
            requirements: optional_text(self.requirements),
            max_participants: require_capacity(self.max_participants)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub event_type: Option<String>,
    pub requirements: Option<String>,
    pub max_participants: Option<i32>,
}

impl UpdateEventRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        let request = Self {
            title: self.title.as_deref().map(|t| require_text("title", t)).transpose()?,
            description: clearable_text(self.description),
            date: self.date,
            location: self.location.as_deref().map(|l| require_text("location", l)).transpose()?,
            event_type: self
                .event_type
                .as_deref()
                .map(|t| require_text("event_type", t))
                .transpose()?,
            requirements: clearable_text(self.requirements),
            max_participants: self.max_participants.map(require_capacity).transpose()?,
        };

        if request.is_empty() {
            return Err(GatherError::InvalidInput("No fields to update".to_string()));
        }
        Ok(request)
    }

    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.event_type.is_none()
            && self.requirements.is_none()
            && self.max_participants.is_none()
    }
}
