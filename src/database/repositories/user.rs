//! User repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ListWrite, UserRepository};
use crate::models::user::{User, UserChanges, UserList};
use crate::utils::errors::{GatherError, Result};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, bio, location, \
     group_ids, created_group_ids, created_event_ids, participating_event_ids, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    async fn outcome(&self, id: Uuid, rows_affected: u64) -> Result<ListWrite> {
        if rows_affected > 0 {
            Ok(ListWrite::Modified)
        } else if self.exists(id).await? {
            Ok(ListWrite::Unchanged)
        } else {
            Ok(ListWrite::Missing)
        }
    }
}

/// Map a unique-constraint failure on `email` to a conflict
fn map_insert_error(error: sqlx::Error, email: &str) -> GatherError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return GatherError::EmailTaken { email: email.to_string() };
        }
    }
    GatherError::Database(error)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    /// Create a new user
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, bio, location,
                               group_ids, created_group_ids, created_event_ids, participating_event_ids,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(&user.groups)
        .bind(&user.created_groups)
        .bind(&user.created_events)
        .bind(&user.participating_events)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &user.email))?;

        Ok(())
    }

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS))
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// List all users with pagination
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update user
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<User>> {
        let email = changes.email.clone().unwrap_or_default();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                location = COALESCE($7, location),
                updated_at = $8
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.bio)
        .bind(&changes.location)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &email))?;

        Ok(user)
    }

    /// Delete user
    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_to_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        let column = list.column();
        let result = sqlx::query(&format!(
            "UPDATE users SET {col} = array_append({col}, $2), updated_at = $3 \
             WHERE id = $1 AND NOT ($2 = ANY({col}))",
            col = column
        ))
        .bind(id)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    async fn remove_from_list(&self, id: Uuid, list: UserList, value: Uuid) -> Result<ListWrite> {
        let column = list.column();
        let result = sqlx::query(&format!(
            "UPDATE users SET {col} = array_remove({col}, $2), updated_at = $3 \
             WHERE id = $1 AND $2 = ANY({col})",
            col = column
        ))
        .bind(id)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.outcome(id, result.rows_affected()).await
    }

    async fn remove_from_all(&self, list: UserList, value: Uuid) -> Result<u64> {
        let column = list.column();
        let result = sqlx::query(&format!(
            "UPDATE users SET {col} = array_remove({col}, $1), updated_at = $2 WHERE $1 = ANY({col})",
            col = column
        ))
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Count total users
    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
