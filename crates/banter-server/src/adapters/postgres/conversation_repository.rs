//! PostgreSQL implementation of ConversationRepository
//!
//! Messages are ordered by `created_at`, ties broken by the `seq` column
//! so insertion order wins when two messages share a timestamp.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use banter::{Conversation, ConversationRepository, DomainError, Message, MessageRole};

pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn messages_for(&self, conversation_ids: &[Uuid]) -> Result<Vec<Message>, DomainError> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, conversation_id, user_id, role, content, created_at
            FROM messages
            WHERE conversation_id = ANY($1)
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(conversation_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(Message::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            messages: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    user_id: Uuid,
    role: String,
    content: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<MessageRole>()
            .map_err(|e| DomainError::Repository(format!("message {}: {}", row.id, e)))?;
        Ok(Self {
            id: row.id,
            conversation_id: row.conversation_id,
            user_id: row.user_id,
            role,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

const INSERT_MESSAGE: &str = r#"
    INSERT INTO messages (id, conversation_id, user_id, role, content, created_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, conversation_id, user_id, role, content, created_at
"#;

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query_as::<_, ConversationRow>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut conversation = Conversation::from(row);
        conversation.messages = self.messages_for(&[id]).await?;
        Ok(Some(conversation))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, DomainError> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            "SELECT * FROM conversations WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut by_conversation: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in self.messages_for(&ids).await? {
            by_conversation
                .entry(message.conversation_id)
                .or_default()
                .push(message);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut conversation = Conversation::from(row);
                conversation.messages = by_conversation.remove(&conversation.id).unwrap_or_default();
                conversation
            })
            .collect())
    }

    async fn create_with_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> Result<Conversation, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (id, user_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let message_row = sqlx::query_as::<_, MessageRow>(INSERT_MESSAGE)
            .bind(first_message.id)
            .bind(row.id)
            .bind(first_message.user_id)
            .bind(first_message.role.as_str())
            .bind(&first_message.content)
            .bind(first_message.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        let mut created = Conversation::from(row);
        created.messages.push(Message::try_from(message_row)?);
        Ok(created)
    }

    async fn update_title(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            UPDATE conversations
            SET title = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut conversation = Conversation::from(row);
        conversation.messages = self.messages_for(&[id]).await?;
        Ok(Some(conversation))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_message(&self, message: &Message) -> Result<Message, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        let row = sqlx::query_as::<_, MessageRow>(INSERT_MESSAGE)
            .bind(message.id)
            .bind(message.conversation_id)
            .bind(message.user_id)
            .bind(message.role.as_str())
            .bind(&message.content)
            .bind(message.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(message.conversation_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Message::try_from(row)
    }

    async fn delete_message(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Message>, DomainError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            DELETE FROM messages
            WHERE id = $1 AND user_id = $2
            RETURNING id, conversation_id, user_id, role, content, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(Message::try_from).transpose()
    }
}
