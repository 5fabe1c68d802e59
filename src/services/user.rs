//! User service implementation
//!
//! This service handles registration, profile management, account deletion
//! and resolving a user's relationship lists into documents.

use tracing::{debug, info};
use uuid::Uuid;

use super::auth::AuthService;
use super::event::purge_event;
use super::group::purge_group;
use super::in_list_order;
use crate::config::PaginationConfig;
use crate::database::DatabaseService;
use crate::models::{
    CreateUserRequest, Event, Group, PageRequest, UpdateUserRequest, User, UserChanges, UserList,
};
use crate::utils::errors::{GatherError, Result};
use crate::utils::helpers::normalize_email;
use crate::utils::logging::log_user_action;

/// User service for managing user operations
#[derive(Clone)]
pub struct UserService {
    db: DatabaseService,
    auth: AuthService,
    pagination: PaginationConfig,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: DatabaseService, auth: AuthService, pagination: PaginationConfig) -> Self {
        Self { db, auth, pagination }
    }

    /// Register a new user; the email must not be taken
    pub async fn register(&self, request: CreateUserRequest) -> Result<User> {
        let request = request.validate()?;
        debug!(email = %request.email, "Registering user");

        if self.db.users.find_by_email(&request.email).await?.is_some() {
            return Err(GatherError::EmailTaken { email: request.email });
        }

        let password_hash = self.auth.hash_password(&request.password)?;
        let user = User::new(request.email, password_hash, request.profile);
        self.db.users.insert(&user).await?;

        log_user_action(user.id, "register", None);
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        debug!(user_id = %user_id, "Getting user by ID");
        self.db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(GatherError::UserNotFound { user_id })
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let email = normalize_email(email);
        self.db
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| GatherError::NotFound(format!("No user with email {}", email)))
    }

    pub async fn list_users(&self, page: PageRequest) -> Result<Vec<User>> {
        let (limit, offset) = page.resolve(&self.pagination)?;
        self.db.users.list(limit, offset).await
    }

    /// Update profile fields, email or password
    pub async fn update_user(&self, user_id: Uuid, request: UpdateUserRequest) -> Result<User> {
        let request = request.validate()?;

        if let Some(email) = &request.email {
            if let Some(existing) = self.db.users.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(GatherError::EmailTaken { email: email.clone() });
                }
            }
        }

        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.auth.hash_password(password))
            .transpose()?;

        let changes = UserChanges {
            email: request.email,
            password_hash,
            first_name: request.profile.first_name,
            last_name: request.profile.last_name,
            bio: request.profile.bio,
            location: request.profile.location,
        };

        let user = self
            .db
            .users
            .update(user_id, &changes)
            .await?
            .ok_or(GatherError::UserNotFound { user_id })?;

        log_user_action(user_id, "update", None);
        Ok(user)
    }

    /// Delete a user with everything they created, and unlink them everywhere
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let user = self.get_user(user_id).await?;

        let events = self.db.events.list_by_creator(user.id).await?;
        for event in &events {
            purge_event(&self.db, event).await?;
        }
        let groups = self.db.groups.list_by_creator(user.id).await?;
        for group in &groups {
            purge_group(&self.db, group).await?;
        }

        let (left_events, left_groups) = futures::try_join!(
            self.db.events.remove_participant_everywhere(user.id),
            self.db.groups.remove_member_everywhere(user.id)
        )?;

        if !self.db.users.delete(user.id).await? {
            return Err(GatherError::UserNotFound { user_id });
        }

        info!(
            user_id = %user_id,
            created_events = events.len(),
            created_groups = groups.len(),
            left_events = left_events,
            left_groups = left_groups,
            "User deleted"
        );
        log_user_action(user_id, "delete", None);
        Ok(())
    }

    /// Events the user participates in, in join order
    pub async fn participating_events(&self, user_id: Uuid) -> Result<Vec<Event>> {
        self.events_in(user_id, UserList::ParticipatingEvents).await
    }

    pub async fn created_events(&self, user_id: Uuid) -> Result<Vec<Event>> {
        self.events_in(user_id, UserList::CreatedEvents).await
    }

    pub async fn groups(&self, user_id: Uuid) -> Result<Vec<Group>> {
        self.groups_in(user_id, UserList::Groups).await
    }

    pub async fn created_groups(&self, user_id: Uuid) -> Result<Vec<Group>> {
        self.groups_in(user_id, UserList::CreatedGroups).await
    }

    async fn events_in(&self, user_id: Uuid, list: UserList) -> Result<Vec<Event>> {
        let user = self.get_user(user_id).await?;
        let ids = user.list(list);
        let events = self.db.events.find_many(ids).await?;
        Ok(in_list_order(ids, events, |event| event.id))
    }

    async fn groups_in(&self, user_id: Uuid, list: UserList) -> Result<Vec<Group>> {
        let user = self.get_user(user_id).await?;
        let ids = user.list(list);
        let groups = self.db.groups.find_many(ids).await?;
        Ok(in_list_order(ids, groups, |group| group.id))
    }
}
