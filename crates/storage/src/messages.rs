use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::{
    domain::{Message, MessageId, UserId},
    protocol::MessageInput,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::Storage;

impl Storage {
    pub async fn insert_message(&self, user_id: &UserId, input: &MessageInput) -> Result<Message> {
        let message = Message {
            id: MessageId::generate(),
            user_id: user_id.clone(),
            subject: input.subject.trim().to_string(),
            body: input.body.trim().to_string(),
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO messages (id, user_id, subject, body, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(message.id.as_str())
        .bind(message.user_id.as_str())
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to insert message from '{user_id}'"))?;
        Ok(message)
    }

    /// Newest first; `author` narrows the list to one user's messages.
    pub async fn list_messages(&self, author: Option<&UserId>) -> Result<Vec<Message>> {
        let rows = if let Some(author) = author {
            sqlx::query(
                "SELECT id, user_id, subject, body, created_at
                 FROM messages
                 WHERE user_id = ?
                 ORDER BY created_at DESC",
            )
            .bind(author.as_str())
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query(
                "SELECT id, user_id, subject, body, created_at
                 FROM messages
                 ORDER BY created_at DESC",
            )
            .fetch_all(self.pool())
            .await?
        };
        Ok(rows.iter().map(message_from_row).collect())
    }

    pub async fn delete_message(&self, id: &MessageId) -> Result<bool> {
        self.delete_by_id("messages", id.as_str()).await
    }
}

fn message_from_row(r: &SqliteRow) -> Message {
    Message {
        id: MessageId(r.get::<String, _>(0)),
        user_id: UserId(r.get::<String, _>(1)),
        subject: r.get::<String, _>(2),
        body: r.get::<String, _>(3),
        created_at: r.get::<DateTime<Utc>, _>(4),
    }
}
