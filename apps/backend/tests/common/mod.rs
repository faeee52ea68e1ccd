//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helper functions for creating users, sets and grammar progress
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lingo_review_backend::db::Database;
use lingo_review_backend::models::FlashcardSet;
use lingo_review_backend::{build_router, AppState};

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = build_router(AppState { db: db.clone() });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let user = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Create a set owned by `user_id` with a fixed creation timestamp.
    pub async fn create_set_at(
        &self,
        user_id: Uuid,
        language: &str,
        created_at: DateTime<Utc>,
    ) -> FlashcardSet {
        let set = self
            .db
            .create_set(user_id, "Test set", language)
            .await
            .expect("Failed to create set");

        sqlx::query("UPDATE flashcard_sets SET created_at = $1 WHERE id = $2")
            .bind(created_at)
            .bind(set.id)
            .execute(self.db.pool())
            .await
            .expect("Failed to backdate set");

        FlashcardSet { created_at, ..set }
    }

    /// Insert pending set reviews on a given date to simulate existing load.
    pub async fn seed_set_load(&self, set: &FlashcardSet, date: DateTime<Utc>, count: i32) {
        for offset in 0..count {
            sqlx::query(
                r#"
                INSERT INTO set_reviews (id, set_id, user_id, scheduled_date, day_offset)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(set.id)
            .bind(set.user_id)
            .bind(date)
            .bind(1000 + offset)
            .execute(self.db.pool())
            .await
            .expect("Failed to seed review");
        }
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Clean up test data for a user.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        // Everything else cascades from users
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
