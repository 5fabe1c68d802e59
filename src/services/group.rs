//! Group service implementation
//!
//! Groups start with their creator as the only member. Joins are refused for
//! private groups, and the creator cannot leave. Every change to `members` is
//! mirrored on the user's `groups` list.

use tracing::{debug, info};
use uuid::Uuid;

use super::in_list_order;
use super::membership::{
    ensure_capacity, ensure_capacity_fits, partial_write, reciprocal_written, target_inserted,
    target_removed,
};
use crate::config::PaginationConfig;
use crate::database::DatabaseService;
use crate::models::{CreateGroupRequest, Group, PageRequest, UpdateGroupRequest, User, UserList};
use crate::utils::errors::{GatherError, MembershipTarget, Result};
use crate::utils::logging::log_group_action;

#[derive(Clone)]
pub struct GroupService {
    db: DatabaseService,
    pagination: PaginationConfig,
}

impl GroupService {
    /// Create a new GroupService instance
    pub fn new(db: DatabaseService, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    /// Create a group with its creator as first member
    pub async fn create_group(&self, creator_id: Uuid, request: CreateGroupRequest) -> Result<Group> {
        let group = Group::new(creator_id, request.validate()?);
        let target = MembershipTarget::Group(group.id);
        debug!(group_id = %group.id, creator_id = %creator_id, "Creating group");

        self.db.groups.insert(&group).await?;

        let created = self
            .db
            .users
            .add_to_list(creator_id, UserList::CreatedGroups, group.id)
            .await;
        reciprocal_written("create_group", target, creator_id, created)?;
        let joined = self.db.users.add_to_list(creator_id, UserList::Groups, group.id).await;
        reciprocal_written("create_group", target, creator_id, joined)?;

        log_group_action(group.id, "create", creator_id, Some(group.name.as_str()));
        Ok(group)
    }

    pub async fn get_group(&self, group_id: Uuid) -> Result<Group> {
        debug!(group_id = %group_id, "Getting group by ID");
        self.db
            .groups
            .find_by_id(group_id)
            .await?
            .ok_or(GatherError::GroupNotFound { group_id })
    }

    /// List groups, newest first
    pub async fn list_groups(&self, page: PageRequest) -> Result<Vec<Group>> {
        let (limit, offset) = page.resolve(&self.pagination)?;
        self.db.groups.list(limit, offset).await
    }

    /// Update a group; only its creator may do this
    pub async fn update_group(
        &self,
        actor_id: Uuid,
        group_id: Uuid,
        request: UpdateGroupRequest,
    ) -> Result<Group> {
        let request = request.validate()?;
        let group = self.owned_group(actor_id, group_id).await?;
        ensure_capacity_fits(
            MembershipTarget::Group(group_id),
            request.max_participants,
            group.members.len(),
        )?;

        let updated = self
            .db
            .groups
            .update(group_id, &request)
            .await?
            .ok_or(GatherError::GroupNotFound { group_id })?;

        log_group_action(group_id, "update", actor_id, None);
        Ok(updated)
    }

    /// Delete a group and unlink it from every member; only its creator may do this
    pub async fn delete_group(&self, actor_id: Uuid, group_id: Uuid) -> Result<()> {
        let group = self.owned_group(actor_id, group_id).await?;
        purge_group(&self.db, &group).await?;

        log_group_action(group_id, "delete", actor_id, None);
        Ok(())
    }

    /// Add a user to a public group
    pub async fn join_group(&self, user_id: Uuid, group_id: Uuid) -> Result<Group> {
        let target = MembershipTarget::Group(group_id);
        let mut group = self.get_group(group_id).await?;

        if group.is_private {
            return Err(GatherError::PrivateGroup { group_id });
        }
        ensure_capacity(target, group.is_full(), group.max_participants)?;
        if group.members.contains(&user_id) {
            return Err(GatherError::AlreadyMember { target });
        }

        target_inserted(target, self.db.groups.add_member(group_id, user_id).await?)?;
        let reciprocal = self.db.users.add_to_list(user_id, UserList::Groups, group_id).await;
        reciprocal_written("join_group", target, user_id, reciprocal)?;

        group.members.push(user_id);
        log_group_action(group_id, "join", user_id, None);
        Ok(group)
    }

    /// Remove a user from a group; the creator stays
    pub async fn leave_group(&self, user_id: Uuid, group_id: Uuid) -> Result<Group> {
        let target = MembershipTarget::Group(group_id);
        let mut group = self.get_group(group_id).await?;

        if group.creator_id == user_id {
            return Err(GatherError::CreatorCannotLeave { group_id });
        }
        if !group.members.contains(&user_id) {
            return Err(GatherError::NotMember { target });
        }

        target_removed(target, self.db.groups.remove_member(group_id, user_id).await?)?;
        let reciprocal = self.db.users.remove_from_list(user_id, UserList::Groups, group_id).await;
        reciprocal_written("leave_group", target, user_id, reciprocal)?;

        group.members.retain(|id| *id != user_id);
        log_group_action(group_id, "leave", user_id, None);
        Ok(group)
    }

    /// Members of a group, in join order
    pub async fn members(&self, group_id: Uuid) -> Result<Vec<User>> {
        let group = self.get_group(group_id).await?;
        let users = self.db.users.find_many(&group.members).await?;
        Ok(in_list_order(&group.members, users, |user| user.id))
    }

    async fn owned_group(&self, actor_id: Uuid, group_id: Uuid) -> Result<Group> {
        let group = self.get_group(group_id).await?;
        if group.creator_id != actor_id {
            return Err(GatherError::PermissionDenied(
                "Only the creator can modify this group".to_string(),
            ));
        }
        Ok(group)
    }
}

/// Delete a group document, then pull its id from every user that references it
pub(crate) async fn purge_group(db: &DatabaseService, group: &Group) -> Result<()> {
    if !db.groups.delete(group.id).await? {
        return Err(GatherError::GroupNotFound { group_id: group.id });
    }

    let unlinked: Result<u64> = async {
        let members = db.users.remove_from_all(UserList::Groups, group.id).await?;
        db.users
            .remove_from_list(group.creator_id, UserList::CreatedGroups, group.id)
            .await?;
        Ok(members)
    }
    .await;

    match unlinked {
        Ok(members) => {
            info!(group_id = %group.id, members = members, "Group deleted and unlinked");
            Ok(())
        }
        Err(error) => Err(partial_write(
            "delete_group",
            MembershipTarget::Group(group.id),
            group.creator_id,
            error,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileFields;
    use assert_matches::assert_matches;

    async fn setup() -> (GroupService, DatabaseService, Uuid) {
        let db = DatabaseService::in_memory();
        let creator = User::new("owner@example.com".into(), "hash".into(), ProfileFields::default());
        db.users.insert(&creator).await.unwrap();
        let service = GroupService::new(
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

    fn request(is_private: bool, max_participants: i32) -> CreateGroupRequest {
        CreateGroupRequest {
            name: "Hikers".to_string(),
            description: Some("Weekend trails".to_string()),
            is_private,
            max_participants,
        }
    }

    #[tokio::test]
    async fn test_create_adds_creator_on_both_sides() {
        let (service, db, creator) = setup().await;
        let group = service.create_group(creator, request(false, 5)).await.unwrap();

        assert_eq!(group.members, vec![creator]);
        let user = db.users.find_by_id(creator).await.unwrap().unwrap();
        assert_eq!(user.created_groups, vec![group.id]);
        assert_eq!(user.groups, vec![group.id]);
    }

    #[tokio::test]
    async fn test_private_group_rejects_join_before_capacity() {
        let (service, db, creator) = setup().await;
        // full and private: privacy wins
        let group = service.create_group(creator, request(true, 1)).await.unwrap();
        let guest = add_user(&db, "guest@example.com").await;

        assert_matches!(
            service.join_group(guest, group.id).await,
            Err(GatherError::PrivateGroup { .. })
        );
    }

    #[tokio::test]
    async fn test_full_group_rejects_existing_member_with_capacity_error() {
        let (service, _db, creator) = setup().await;
        let group = service.create_group(creator, request(false, 1)).await.unwrap();

        assert_matches!(
            service.join_group(creator, group.id).await,
            Err(GatherError::CapacityReached { max: 1, .. })
        );
    }

    #[tokio::test]
    async fn test_creator_cannot_leave() {
        let (service, db, creator) = setup().await;
        let group = service.create_group(creator, request(false, 5)).await.unwrap();
        let guest = add_user(&db, "guest@example.com").await;

        assert_matches!(
            service.leave_group(creator, group.id).await,
            Err(GatherError::CreatorCannotLeave { .. })
        );
        assert_matches!(
            service.leave_group(guest, group.id).await,
            Err(GatherError::NotMember { .. })
        );
    }

    #[tokio::test]
    async fn test_members_in_join_order() {
        let (service, db, creator) = setup().await;
        let group = service.create_group(creator, request(false, 5)).await.unwrap();
        let first = add_user(&db, "first@example.com").await;
        let second = add_user(&db, "second@example.com").await;
        service.join_group(first, group.id).await.unwrap();
        service.join_group(second, group.id).await.unwrap();

        let members: Vec<Uuid> = service.members(group.id).await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(members, vec![creator, first, second]);
    }

    #[tokio::test]
    async fn test_delete_requires_creator_and_unlinks() {
        let (service, db, creator) = setup().await;
        let group = service.create_group(creator, request(false, 5)).await.unwrap();
        let guest = add_user(&db, "guest@example.com").await;
        service.join_group(guest, group.id).await.unwrap();

        assert_matches!(
            service.delete_group(guest, group.id).await,
            Err(GatherError::PermissionDenied(_))
        );

        service.delete_group(creator, group.id).await.unwrap();
        for id in [creator, guest] {
            let user = db.users.find_by_id(id).await.unwrap().unwrap();
            assert!(user.groups.is_empty());
            assert!(user.created_groups.is_empty());
        }
    }
}
