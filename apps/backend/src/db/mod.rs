//! PostgreSQL database operations

pub mod reviews;

use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that only connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Start a transaction
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, name: Option<&str>) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Settings Repository ===

    /// Get review settings for a user, defaults when never saved
    pub async fn get_review_settings(&self, user_id: Uuid) -> Result<UserReviewSettings> {
        let settings = sqlx::query_as::<_, DbReviewSettings>(
            r#"
            SELECT user_id, default_review_days, max_reviews_per_day
            FROM review_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(|s| s.to_settings())
        .unwrap_or_default();

        Ok(settings)
    }

    /// Upsert review settings
    pub async fn upsert_review_settings(
        &self,
        user_id: Uuid,
        settings: &UserReviewSettings,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_settings (user_id, default_review_days, max_reviews_per_day)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                default_review_days = EXCLUDED.default_review_days,
                max_reviews_per_day = EXCLUDED.max_reviews_per_day,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(settings.default_review_days.to_i32_vec())
        .bind(settings.max_reviews_per_day as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Flashcard Set Repository ===

    /// Create a flashcard set
    pub async fn create_set(&self, user_id: Uuid, title: &str, language: &str) -> Result<FlashcardSet> {
        let set = sqlx::query_as::<_, FlashcardSet>(
            r#"
            INSERT INTO flashcard_sets (user_id, title, language)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, language, created_at, completed_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(language)
        .fetch_one(&self.pool)
        .await?;

        Ok(set)
    }

    /// Get all sets owned by a user
    pub async fn get_sets(&self, user_id: Uuid) -> Result<Vec<FlashcardSet>> {
        let sets = sqlx::query_as::<_, FlashcardSet>(
            r#"
            SELECT id, user_id, title, language, created_at, completed_at
            FROM flashcard_sets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sets)
    }

    /// Get a set if it is owned by the user
    pub async fn get_set(&self, user_id: Uuid, set_id: Uuid) -> Result<Option<FlashcardSet>> {
        let set = sqlx::query_as::<_, FlashcardSet>(
            r#"
            SELECT id, user_id, title, language, created_at, completed_at
            FROM flashcard_sets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(set_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    /// Stamp a set as completed
    pub async fn mark_set_completed(&self, user_id: Uuid, set_id: Uuid) -> Result<Option<FlashcardSet>> {
        let set = sqlx::query_as::<_, FlashcardSet>(
            r#"
            UPDATE flashcard_sets
            SET completed_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, language, created_at, completed_at
            "#,
        )
        .bind(set_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(set)
    }

    // === Grammar Progress Repository ===

    /// Get grammar progress for a module
    pub async fn get_grammar_progress(
        &self,
        user_id: Uuid,
        module_id: &str,
    ) -> Result<Option<GrammarProgress>> {
        let progress = sqlx::query_as::<_, GrammarProgress>(
            r#"
            SELECT id, user_id, module_id, language, level, completed, completed_at, created_at
            FROM grammar_progress
            WHERE user_id = $1 AND module_id = $2
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    /// Record a grammar module as completed, creating the progress row if needed
    pub async fn upsert_grammar_completed(
        &self,
        user_id: Uuid,
        module_id: &str,
        language: &str,
        level: &str,
    ) -> Result<GrammarProgress> {
        let progress = sqlx::query_as::<_, GrammarProgress>(
            r#"
            INSERT INTO grammar_progress (user_id, module_id, language, level, completed, completed_at)
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            ON CONFLICT (user_id, module_id) DO UPDATE SET
                language = EXCLUDED.language,
                level = EXCLUDED.level,
                completed = TRUE,
                completed_at = NOW()
            RETURNING id, user_id, module_id, language, level, completed, completed_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(module_id)
        .bind(language)
        .bind(level)
        .fetch_one(&self.pool)
        .await?;

        Ok(progress)
    }
}
