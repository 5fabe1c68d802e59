//! Group repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{GroupRepository, ListWrite};
use crate::models::group::{Group, UpdateGroupRequest};
use crate::utils::errors::Result;

const GROUP_COLUMNS: &str =
    "id, name, description, is_private, creator_id, member_ids, max_participants, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn outcome(&self, id: Uuid, rows_affected: u64) -> Result<ListWrite> {
        if rows_affected > 0 {
            return Ok(ListWrite::Modified);
        }

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists.0 { ListWrite::Unchanged } else { ListWrite::Missing })
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    /// Create a new group
    async fn insert(&self, group: &Group) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO groups (id, name, description, is_private, creator_id, member_ids,
                                max_participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.is_private)
        .bind(group.creator_id)
        .bind(&group.members)
        .bind(group.max_participants)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find group by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!("SELECT {} FROM groups WHERE id = $1", GROUP_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(group)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Group>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let groups = sqlx::query_as::<_, Group>(&format!("SELECT {} FROM groups WHERE id = ANY($1)", GROUP_COLUMNS))
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(groups)
    }

    /// List all groups with pagination
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM groups ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            GROUP_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {} FROM groups WHERE creator_id = $1 ORDER BY created_at DESC, id",
            GROUP_COLUMNS
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(groups)
    }

    /// Update group
    async fn update(&self, id: Uuid, request: &UpdateGroupRequest) -> Result<Option<Group>> {
        let group = sqlx::query_as::<_, Group>(&format!(
            r#"
            UPDATE groups
            SET name = COALESCE($2, name),
                description = CASE WHEN $3::text IS NULL THEN description ELSE NULLIF($3, '') END,
                is_private = COALESCE($4, is_private),
                max_participants = COALESCE($5, max_participants),
                updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            GROUP_COLUMNS
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.is_private)
        .bind(request.max_participants)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(group)
    }

    /// Delete group
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add member to group
    async fn add_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let result = sqlx::query(
            "UPDATE groups SET member_ids = array_append(member_ids, $2), updated_at = $3 \
             WHERE id = $1 AND NOT ($2 = ANY(member_ids))",
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    /// Remove member from group
    async fn remove_member(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let result = sqlx::query(
            "UPDATE groups SET member_ids = array_remove(member_ids, $2), updated_at = $3 \
             WHERE id = $1 AND $2 = ANY(member_ids)",
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    async fn remove_member_everywhere(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE groups SET member_ids = array_remove(member_ids, $1), updated_at = $2 \
             WHERE $1 = ANY(member_ids)",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count total groups
    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
