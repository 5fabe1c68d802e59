//! Event service implementation
//!
//! Creation, creator-only mutation, and participant management for events.
//! Every change to an event's participants is mirrored on the user's
//! `participating_events` list.

use tracing::{debug, info};
use uuid::Uuid;

use super::in_list_order;
use super::membership::{
    ensure_capacity, ensure_capacity_fits, partial_write, reciprocal_written, target_inserted,
    target_removed,
};
use crate::config::PaginationConfig;
use crate::database::DatabaseService;
use crate::models::{CreateEventRequest, Event, PageRequest, UpdateEventRequest, User, UserList};
use crate::utils::errors::{GatherError, MembershipTarget, Result};
use crate::utils::logging::log_event_action;

#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    pagination: PaginationConfig,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    /// Create an event and record it on the creator's `created_events`
    pub async fn create_event(&self, creator_id: Uuid, request: CreateEventRequest) -> Result<Event> {
        let event = Event::new(creator_id, request.validate()?);
        debug!(event_id = %event.id, creator_id = %creator_id, "Creating event");

        self.db.events.insert(&event).await?;

        let back_link = self
            .db
            .users
            .add_to_list(creator_id, UserList::CreatedEvents, event.id)
            .await;
        reciprocal_written("create_event", MembershipTarget::Event(event.id), creator_id, back_link)?;

        log_event_action(event.id, "create", creator_id, Some(event.title.as_str()));
        Ok(event)
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        debug!(event_id = %event_id, "Getting event by ID");
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(GatherError::EventNotFound { event_id })
    }

    /// List events ordered by date
    pub async fn list_events(&self, page: PageRequest) -> Result<Vec<Event>> {
        let (limit, offset) = page.resolve(&self.pagination)?;
        self.db.events.list(limit, offset).await
    }

    pub async fn events_by_creator(&self, creator_id: Uuid) -> Result<Vec<Event>> {
        self.db.events.list_by_creator(creator_id).await
    }

    /// Update an event; only its creator may do this
    pub async fn update_event(
        &self,
        actor_id: Uuid,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let request = request.validate()?;
        let event = self.owned_event(actor_id, event_id).await?;
        ensure_capacity_fits(
            MembershipTarget::Event(event_id),
            request.max_participants,
            event.participants.len(),
        )?;

        let updated = self
            .db
            .events
            .update(event_id, &request)
            .await?
            .ok_or(GatherError::EventNotFound { event_id })?;

        log_event_action(event_id, "update", actor_id, None);
        Ok(updated)
    }

    /// Delete an event and unlink it from every user; only its creator may do this
    pub async fn delete_event(&self, actor_id: Uuid, event_id: Uuid) -> Result<()> {
        let event = self.owned_event(actor_id, event_id).await?;
        purge_event(&self.db, &event).await?;

        log_event_action(event_id, "delete", actor_id, None);
        Ok(())
    }

    /// Add a user to an event's participants
    pub async fn join_event(&self, user_id: Uuid, event_id: Uuid) -> Result<Event> {
        let target = MembershipTarget::Event(event_id);
        let mut event = self.get_event(event_id).await?;

        ensure_capacity(target, event.is_full(), event.max_participants)?;
        if event.participants.contains(&user_id) {
            return Err(GatherError::AlreadyMember { target });
        }

        target_inserted(target, self.db.events.add_participant(event_id, user_id).await?)?;
        let reciprocal = self
            .db
            .users
            .add_to_list(user_id, UserList::ParticipatingEvents, event_id)
            .await;
        reciprocal_written("join_event", target, user_id, reciprocal)?;

        event.participants.push(user_id);
        log_event_action(event_id, "join", user_id, None);
        Ok(event)
    }

    /// Remove a user from an event's participants
    pub async fn leave_event(&self, user_id: Uuid, event_id: Uuid) -> Result<Event> {
        let target = MembershipTarget::Event(event_id);
        let mut event = self.get_event(event_id).await?;

        if !event.participants.contains(&user_id) {
            return Err(GatherError::NotMember { target });
        }

        target_removed(target, self.db.events.remove_participant(event_id, user_id).await?)?;
        let reciprocal = self
            .db
            .users
            .remove_from_list(user_id, UserList::ParticipatingEvents, event_id)
            .await;
        reciprocal_written("leave_event", target, user_id, reciprocal)?;

        event.participants.retain(|id| *id != user_id);
        log_event_action(event_id, "leave", user_id, None);
        Ok(event)
    }

    /// Users participating in an event, in join order
    pub async fn participants(&self, event_id: Uuid) -> Result<Vec<User>> {
        let event = self.get_event(event_id).await?;
        let users = self.db.users.find_many(&event.participants).await?;
        Ok(in_list_order(&event.participants, users, |user| user.id))
    }

    async fn owned_event(&self, actor_id: Uuid, event_id: Uuid) -> Result<Event> {
        let event = self.get_event(event_id).await?;
        if event.creator_id != actor_id {
            return Err(GatherError::PermissionDenied(
                "Only the creator can modify this event".to_string(),
            ));
        }
        Ok(event)
    }
}

/// Delete an event document, then pull its id from every user that references it
pub(crate) async fn purge_event(db: &DatabaseService, event: &Event) -> Result<()> {
    if !db.events.delete(event.id).await? {
        return Err(GatherError::EventNotFound { event_id: event.id });
    }

    let unlinked: Result<u64> = async {
        let participants = db
            .users
            .remove_from_all(UserList::ParticipatingEvents, event.id)
            .await?;
        db.users
            .remove_from_list(event.creator_id, UserList::CreatedEvents, event.id)
            .await?;
        Ok(participants)
    }
    .await;

    match unlinked {
        Ok(participants) => {
            info!(event_id = %event.id, participants = participants, "Event deleted and unlinked");
            Ok(())
        }
        Err(error) => Err(partial_write(
            "delete_event",
            MembershipTarget::Event(event.id),
            event.creator_id,
            error,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileFields;
    use assert_matches::assert_matches;
    use chrono::Utc;

    async fn setup() -> (EventService, DatabaseService, Uuid) {
        let db = DatabaseService::in_memory();
        let creator = User::new("host@example.com".into(), "hash".into(), ProfileFields::default());
        db.users.insert(&creator).await.unwrap();
        let service = EventService::new(
            db.clone(),
            PaginationConfig { default_limit: 100, max_limit: 100 },
        );
        (service, db, creator.id)
    }

    async fn add_user(db: &DatabaseService, email: &str) -> Uuid {
        let user = User::new(email.into(), "hash".into(), ProfileFields::default());
        db.users.insert(&user).await.unwrap();
        user.id
    }

    fn request(max_participants: i32) -> CreateEventRequest {
        CreateEventRequest {
            title: "Board games".to_string(),
            description: None,
            date: Utc::now(),
            location: "Library".to_string(),
            event_type: "social".to_string(),
            requirements: None,
            max_participants,
        }
    }

    #[tokio::test]
    async fn test_create_links_creator() {
        let (service, db, creator) = setup().await;
        let event = service.create_event(creator, request(4)).await.unwrap();

        assert!(event.participants.is_empty());
        let user = db.users.find_by_id(creator).await.unwrap().unwrap();
        assert_eq!(user.created_events, vec![event.id]);
    }

    #[tokio::test]
    async fn test_join_and_leave_update_both_sides() {
        let (service, db, creator) = setup().await;
        let event = service.create_event(creator, request(4)).await.unwrap();
        let guest = add_user(&db, "guest@example.com").await;

        let joined = service.join_event(guest, event.id).await.unwrap();
        assert_eq!(joined.participants, vec![guest]);
        let user = db.users.find_by_id(guest).await.unwrap().unwrap();
        assert_eq!(user.participating_events, vec![event.id]);

        assert_matches!(
            service.join_event(guest, event.id).await,
            Err(GatherError::AlreadyMember { .. })
        );

        service.leave_event(guest, event.id).await.unwrap();
        let user = db.users.find_by_id(guest).await.unwrap().unwrap();
        assert!(user.participating_events.is_empty());
        assert_matches!(
            service.leave_event(guest, event.id).await,
            Err(GatherError::NotMember { .. })
        );
    }

    #[tokio::test]
    async fn test_only_creator_may_update() {
        let (service, db, creator) = setup().await;
        let event = service.create_event(creator, request(4)).await.unwrap();
        let other = add_user(&db, "other@example.com").await;

        let change = UpdateEventRequest { title: Some("Chess".into()), ..Default::default() };
        assert_matches!(
            service.update_event(other, event.id, change.clone()).await,
            Err(GatherError::PermissionDenied(_))
        );
        assert_matches!(
            service.update_event(creator, Uuid::new_v4(), change.clone()).await,
            Err(GatherError::EventNotFound { .. })
        );

        let updated = service.update_event(creator, event.id, change).await.unwrap();
        assert_eq!(updated.title, "Chess");
    }

    #[tokio::test]
    async fn test_capacity_cannot_drop_below_participants() {
        let (service, db, creator) = setup().await;
        let event = service.create_event(creator, request(3)).await.unwrap();
        for email in ["a@example.com", "b@example.com"] {
            let id = add_user(&db, email).await;
            service.join_event(id, event.id).await.unwrap();
        }

        let shrink = UpdateEventRequest { max_participants: Some(1), ..Default::default() };
        assert_matches!(
            service.update_event(creator, event.id, shrink).await,
            Err(GatherError::CapacityBelowMembers { requested: 1, current: 2, .. })
        );
    }

    #[tokio::test]
    async fn test_delete_unlinks_participants() {
        let (service, db, creator) = setup().await;
        let event = service.create_event(creator, request(4)).await.unwrap();
        let guest = add_user(&db, "guest@example.com").await;
        service.join_event(guest, event.id).await.unwrap();

        service.delete_event(creator, event.id).await.unwrap();

        assert!(db.events.find_by_id(event.id).await.unwrap().is_none());
        let guest = db.users.find_by_id(guest).await.unwrap().unwrap();
        assert!(guest.participating_events.is_empty());
        let creator = db.users.find_by_id(creator).await.unwrap().unwrap();
        assert!(creator.created_events.is_empty());
    }
}
