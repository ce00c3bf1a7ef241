//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use banter::{DomainError, OAuthProvider, User, UserRepository};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    hashed_password: Option<String>,
    google_id: Option<String>,
    facebook_id: Option<String>,
    github_id: Option<String>,
    display_name: Option<String>,
    image: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            hashed_password: row.hashed_password,
            google_id: row.google_id,
            facebook_id: row.facebook_id,
            github_id: row.github_id,
            display_name: row.display_name,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn provider_column(provider: OAuthProvider) -> &'static str {
    match provider {
        OAuthProvider::Google => "google_id",
        OAuthProvider::Facebook => "facebook_id",
        OAuthProvider::Github => "github_id",
    }
}

/// Unique violations become `Conflict` so the caller can answer 409
fn map_write_error(e: sqlx::Error) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::Conflict("User already exists. Please login.".to_string())
        }
        _ => DomainError::Repository(e.to_string()),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn find_by_provider_id(
        &self,
        provider: OAuthProvider,
        provider_user_id: &str,
    ) -> Result<Option<User>, DomainError> {
        // Column name comes from a closed enum, never from input
        let query = format!(
            "SELECT * FROM users WHERE {} = $1",
            provider_column(provider)
        );
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(provider_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                id, username, hashed_password, google_id, facebook_id, github_id,
                display_name, image, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                hashed_password = EXCLUDED.hashed_password,
                google_id = EXCLUDED.google_id,
                facebook_id = EXCLUDED.facebook_id,
                github_id = EXCLUDED.github_id,
                display_name = EXCLUDED.display_name,
                image = EXCLUDED.image,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.hashed_password)
        .bind(&user.google_id)
        .bind(&user.facebook_id)
        .bind(&user.github_id)
        .bind(&user.display_name)
        .bind(&user.image)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }
}
