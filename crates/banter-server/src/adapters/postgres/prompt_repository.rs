//! PostgreSQL implementation of PromptRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use banter::{DomainError, Prompt, PromptRepository};

pub struct PgPromptRepository {
    pool: PgPool,
}

impl PgPromptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PromptRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    content: String,
    description: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<i32>,
    is_system: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<PromptRow> for Prompt {
    fn from(row: PromptRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            content: row.content,
            description: row.description,
            model: row.model,
            temperature: row.temperature,
            max_tokens: row.max_tokens,
            is_system: row.is_system,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PromptRepository for PgPromptRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prompt>, DomainError> {
        let row = sqlx::query_as::<_, PromptRow>("SELECT * FROM prompts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Prompt>, DomainError> {
        let rows = sqlx::query_as::<_, PromptRow>(
            "SELECT * FROM prompts WHERE user_id = $1 ORDER BY name ASC, created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save(&self, prompt: &Prompt) -> Result<Prompt, DomainError> {
        let row = sqlx::query_as::<_, PromptRow>(
            r#"
            INSERT INTO prompts (
                id, user_id, name, content, description, model, temperature,
                max_tokens, is_system, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                content = EXCLUDED.content,
                description = EXCLUDED.description,
                model = EXCLUDED.model,
                temperature = EXCLUDED.temperature,
                max_tokens = EXCLUDED.max_tokens,
                is_system = EXCLUDED.is_system,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(prompt.id)
        .bind(prompt.user_id)
        .bind(&prompt.name)
        .bind(&prompt.content)
        .bind(&prompt.description)
        .bind(&prompt.model)
        .bind(prompt.temperature)
        .bind(prompt.max_tokens)
        .bind(prompt.is_system)
        .bind(prompt.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
