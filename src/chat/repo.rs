use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

pub const SENDER_USER: &str = "user";
pub const SENDER_ASSISTANT: &str = "assistant";

/// One turn in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender: String,
    pub body: String,
    pub conversation_id: String,
    pub created_at: OffsetDateTime,
}

impl ChatMessage {
    pub async fn append(
        db: &PgPool,
        user_id: Uuid,
        sender: &str,
        body: &str,
        conversation_id: &str,
    ) -> anyhow::Result<ChatMessage> {
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (user_id, sender, body, conversation_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, sender, body, conversation_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(sender)
        .bind(body)
        .bind(conversation_id)
        .fetch_one(db)
        .await?;
        Ok(message)
    }

    /// Full history for one of the caller's conversations, oldest first.
    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        conversation_id: &str,
    ) -> anyhow::Result<Vec<ChatMessage>> {
        let rows = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, user_id, sender, body, conversation_id, created_at
            FROM chat_messages
            WHERE user_id = $1 AND conversation_id = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(conversation_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
