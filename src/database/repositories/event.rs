//! Event repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventRepository, ListWrite};
use crate::models::event::{Event, UpdateEventRequest};
use crate::utils::errors::Result;

const EVENT_COLUMNS: &str = "id, title, description, date, location, event_type, requirements, \
     creator_id, participant_ids, max_participants, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn outcome(&self, id: Uuid, rows_affected: u64) -> Result<ListWrite> {
        if rows_affected > 0 {
            return Ok(ListWrite::Modified);
        }

        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists.0 { ListWrite::Unchanged } else { ListWrite::Missing })
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    /// Create a new event
    async fn insert(&self, event: &Event) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, date, location, event_type, requirements,
                                creator_id, participant_ids, max_participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.event_type)
        .bind(&event.requirements)
        .bind(event.creator_id)
        .bind(&event.participants)
        .bind(event.max_participants)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find event by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let events = sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = ANY($1)", EVENT_COLUMNS))
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// List events with pagination
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY date ASC, id LIMIT $1 OFFSET $2",
            EVENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events created by user
    async fn list_by_creator(&self, creator_id: Uuid) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events WHERE creator_id = $1 ORDER BY date ASC, id",
            EVENT_COLUMNS
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Update event
    async fn update(&self, id: Uuid, request: &UpdateEventRequest) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = CASE WHEN $3::text IS NULL THEN description ELSE NULLIF($3, '') END,
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                event_type = COALESCE($6, event_type),
                requirements = CASE WHEN $7::text IS NULL THEN requirements ELSE NULLIF($7, '') END,
                max_participants = COALESCE($8, max_participants),
                updated_at = $9
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.date)
        .bind(&request.location)
        .bind(&request.event_type)
        .bind(&request.requirements)
        .bind(request.max_participants)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let result = sqlx::query(
            "UPDATE events SET participant_ids = array_append(participant_ids, $2), updated_at = $3 \
             WHERE id = $1 AND NOT ($2 = ANY(participant_ids))",
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    async fn remove_participant(&self, id: Uuid, user_id: Uuid) -> Result<ListWrite> {
        let result = sqlx::query(
            "UPDATE events SET participant_ids = array_remove(participant_ids, $2), updated_at = $3 \
             WHERE id = $1 AND $2 = ANY(participant_ids)",
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    async fn remove_participant_everywhere(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET participant_ids = array_remove(participant_ids, $1), updated_at = $2 \
             WHERE $1 = ANY(participant_ids)",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count total events
    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
