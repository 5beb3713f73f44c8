//! Message repository

use crate::domain::entities::{Message, NewMessage};
use crate::repository::MessageStore;
use chatline_common::Result;
use sqlx::PgPool;

/// Postgres-backed conversation store
#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MessageStore for MessageRepository {
    async fn append(&self, message: &NewMessage) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (content, role)
            VALUES ($1, $2)
            RETURNING id, content, role, created_at
            "#,
        )
        .bind(message.content())
        .bind(message.role())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                role = %message.role(),
                content_len = message.content().len(),
                error = %e,
                "Failed to insert message"
            );
            e
        })?;

        Ok(created)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Message>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, content, role, created_at
            FROM messages
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
