//! Repository layer for database operations
//!
//! The user directory plus one workspace document per user. Workspace
//! collections are stored as a single JSON value keyed by user id,
//! the same durable get/set contract the frontend previously ran
//! against browser-local storage.

use super::models::StoredUser;
use crate::engine::Workspace;
use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ===== User directory =====

    /// Insert a directory row. The caller is responsible for hashing
    /// the password and checking email uniqueness beforehand; the
    /// UNIQUE constraint is the final guard.
    pub async fn insert_user(&self, user: &StoredUser) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, company_name, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.company_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created user: {}", user.id);
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let user = sqlx::query_as::<_, StoredUser>(
            r#"
            SELECT * FROM users WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<StoredUser>> {
        let user = sqlx::query_as::<_, StoredUser>(
            r#"
            SELECT * FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete an account. The workspace row goes with it via the
    /// foreign-key cascade.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }

        tracing::debug!("Deleted user: {}", id);
        Ok(())
    }

    // ===== Workspace documents =====

    /// Load a user's collections. A user without a stored document
    /// gets an empty workspace, never an error.
    pub async fn load_workspace(&self, user_id: &str) -> Result<Workspace> {
        let data: Option<String> =
            sqlx::query_scalar("SELECT data FROM workspaces WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        match data {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Workspace::new()),
        }
    }

    /// Mirror a user's collections to durable storage, replacing any
    /// previous document.
    pub async fn save_workspace(&self, user_id: &str, workspace: &Workspace) -> Result<()> {
        let json = serde_json::to_string(workspace)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO workspaces (user_id, data, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&json)
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Saved workspace for user: {}", user_id);
        Ok(())
    }

    /// Wipe a user's collections back to empty.
    pub async fn reset_workspace(&self, user_id: &str) -> Result<Workspace> {
        let empty = Workspace::new();
        self.save_workspace(user_id, &empty).await?;

        tracing::debug!("Reset workspace for user: {}", user_id);
        Ok(empty)
    }
}
