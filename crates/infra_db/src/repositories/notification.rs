//! Notification persistence

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for user notifications
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an unread notification for a user
    pub async fn insert(
        &self,
        user_id: Uuid,
        message: &str,
        category: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO notifications (notification_id, user_id, message, category, is_read, created_at) \
             VALUES ($1, $2, $3, $4, FALSE, $5)",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(message)
        .bind(category)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)?;
        Ok(())
    }
}
