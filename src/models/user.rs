//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{GatherError, Result};
use crate::utils::helpers::{is_valid_email, normalize_email, optional_text};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[sqlx(rename = "group_ids")]
    pub groups: Vec<Uuid>,
    #[sqlx(rename = "created_group_ids")]
    pub created_groups: Vec<Uuid>,
    #[sqlx(rename = "created_event_ids")]
    pub created_events: Vec<Uuid>,
    #[sqlx(rename = "participating_event_ids")]
    pub participating_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Relationship lists stored on a user document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserList {
    Groups,
    CreatedGroups,
    CreatedEvents,
    ParticipatingEvents,
}

impl UserList {
    /// Column holding this list
    pub fn column(self) -> &'static str {
        match self {
            UserList::Groups => "group_ids",
            UserList::CreatedGroups => "created_group_ids",
            UserList::CreatedEvents => "created_event_ids",
            UserList::ParticipatingEvents => "participating_event_ids",
        }
    }
}

impl User {
    /// Build a fresh user document with empty relationship lists
    pub fn new(email: String, password_hash: String, profile: ProfileFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            location: profile.location,
            groups: Vec::new(),
            created_groups: Vec::new(),
            created_events: Vec::new(),
            participating_events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn list(&self, list: UserList) -> &[Uuid] {
        match list {
            UserList::Groups => &self.groups,
            UserList::CreatedGroups => &self.created_groups,
            UserList::CreatedEvents => &self.created_events,
            UserList::ParticipatingEvents => &self.participating_events,
        }
    }

    pub fn list_mut(&mut self, list: UserList) -> &mut Vec<Uuid> {
        match list {
            UserList::Groups => &mut self.groups,
            UserList::CreatedGroups => &mut self.created_groups,
            UserList::CreatedEvents => &mut self.created_events,
            UserList::ParticipatingEvents => &mut self.participating_events,
        }
    }

    /// Apply already-validated field changes
    pub fn apply(&mut self, changes: &UserChanges) {
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            self.password_hash = hash.clone();
        }
        if let Some(first_name) = &changes.first_name {
            self.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            self.last_name = Some(last_name.clone());
        }
        if let Some(bio) = &changes.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(location) = &changes.location {
            self.location = Some(location.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Optional profile fields shared by registration and updates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl ProfileFields {
    fn normalized(self) -> Self {
        Self {
            first_name: optional_text(self.first_name),
            last_name: optional_text(self.last_name),
            bio: optional_text(self.bio),
            location: optional_text(self.location),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl CreateUserRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        if !is_valid_email(&self.email) {
            return Err(GatherError::InvalidInput(format!("Invalid email: {}", self.email)));
        }
        validate_password(&self.password)?;

        Ok(Self {
            email: normalize_email(&self.email),
            password: self.password,
            profile: self.profile.normalized(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl UpdateUserRequest {
    /// Check and normalize the request
    pub fn validate(self) -> Result<Self> {
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(GatherError::InvalidInput(format!("Invalid email: {}", email)));
            }
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }

        let request = Self {
            email: self.email.as_deref().map(normalize_email),
            password: self.password,
            profile: self.profile.normalized(),
        };

        if request.is_empty() {
            return Err(GatherError::InvalidInput("No fields to update".to_string()));
        }
        Ok(request)
    }

    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.profile.first_name.is_none()
            && self.profile.last_name.is_none()
            && self.profile.bio.is_none()
            && self.profile.location.is_none()
    }
}

/// Storage-level changes to a user, with the password already hashed
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub groups: Vec<Uuid>,
    pub created_groups: Vec<Uuid>,
    pub created_events: Vec<Uuid>,
    pub participating_events: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            location: user.location,
            groups: user.groups,
            created_groups: user.created_groups,
            created_events: user.created_events,
            participating_events: user.participating_events,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Bearer token issued on register and login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: Uuid,
    pub email: String,
}

/// Result of a profile update
///
/// Tokens name their user by email, so an email change comes with a
/// replacement token; the old one no longer resolves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdateResponse {
    pub user: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenResponse>,
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(GatherError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
