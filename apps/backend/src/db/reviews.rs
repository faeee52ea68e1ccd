//! Scheduled review queries shared by both review kinds.
//!
//! Each [`ReviewKind`] maps to its own review table and parent table; the SQL
//! is otherwise identical. Every query takes an executor so it can run on the
//! pool or inside a schedule transaction.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{DbCalendarReview, DbScheduledReview, ReviewKind};

/// Table layout for one review kind
#[derive(Debug, Clone, Copy)]
pub struct ReviewTables {
    pub reviews: &'static str,
    pub parent: &'static str,
    pub parent_column: &'static str,
    /// Parent column shown on the calendar
    pub label_column: &'static str,
}

const SET_TABLES: ReviewTables = ReviewTables {
    reviews: "set_reviews",
    parent: "flashcard_sets",
    parent_column: "set_id",
    label_column: "title",
};

const GRAMMAR_TABLES: ReviewTables = ReviewTables {
    reviews: "grammar_reviews",
    parent: "grammar_progress",
    parent_column: "progress_id",
    label_column: "module_id",
};

pub fn tables(kind: ReviewKind) -> ReviewTables {
    match kind {
        ReviewKind::Set => SET_TABLES,
        ReviewKind::Grammar => GRAMMAR_TABLES,
    }
}

fn returning(t: &ReviewTables) -> String {
    format!(
        "r.id, r.{pc} AS parent_id, r.user_id, r.scheduled_date, r.day_offset, \
         r.completed, r.completed_at, r.created_at",
        pc = t.parent_column
    )
}

/// Serialize schedule writes for one (user, kind, language) scope until the
/// surrounding transaction ends.
pub async fn lock_scope<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    user_id: Uuid,
    language: &str,
) -> Result<()> {
    let key = format!("{}:{}:{}", user_id, kind.as_str(), language);
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete every review of a parent
pub async fn delete_for_parent<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    parent_id: Uuid,
) -> Result<u64> {
    let t = tables(kind);
    let sql = format!("DELETE FROM {} WHERE {} = $1", t.reviews, t.parent_column);
    let result = sqlx::query(&sql).bind(parent_id).execute(executor).await?;
    Ok(result.rows_affected())
}

/// Scheduled dates of pending reviews in a scope, excluding one parent
pub async fn pending_dates_in_scope<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    user_id: Uuid,
    language: &str,
    exclude_parent: Uuid,
) -> Result<Vec<DateTime<Utc>>> {
    let t = tables(kind);
    let sql = format!(
        r#"
        SELECT r.scheduled_date
        FROM {reviews} r
        JOIN {parent} p ON p.id = r.{pc}
        WHERE r.user_id = $1 AND p.user_id = $1 AND p.language = $2
          AND r.completed = FALSE AND r.{pc} <> $3
        "#,
        reviews = t.reviews,
        parent = t.parent,
        pc = t.parent_column,
    );

    let dates = sqlx::query_scalar::<_, DateTime<Utc>>(&sql)
        .bind(user_id)
        .bind(language)
        .bind(exclude_parent)
        .fetch_all(executor)
        .await?;

    Ok(dates)
}

/// Insert a batch of reviews for one parent in a single statement
pub async fn insert_batch<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    parent_id: Uuid,
    user_id: Uuid,
    rows: &[(DateTime<Utc>, i32)],
) -> Result<Vec<DbScheduledReview>> {
    let t = tables(kind);
    let ids: Vec<Uuid> = rows.iter().map(|_| Uuid::new_v4()).collect();
    let dates: Vec<DateTime<Utc>> = rows.iter().map(|(d, _)| *d).collect();
    let offsets: Vec<i32> = rows.iter().map(|(_, o)| *o).collect();

    let sql = format!(
        r#"
        INSERT INTO {reviews} AS r (id, {pc}, user_id, scheduled_date, day_offset)
        SELECT t.id, $2, $3, t.scheduled_date, t.day_offset
        FROM UNNEST($1::uuid[], $4::timestamptz[], $5::int[]) AS t(id, scheduled_date, day_offset)
        RETURNING {returning}
        "#,
        reviews = t.reviews,
        pc = t.parent_column,
        returning = returning(&t),
    );

    let mut inserted = sqlx::query_as::<_, DbScheduledReview>(&sql)
        .bind(&ids)
        .bind(parent_id)
        .bind(user_id)
        .bind(&dates)
        .bind(&offsets)
        .fetch_all(executor)
        .await?;

    inserted.sort_by_key(|r| (r.scheduled_date, r.day_offset));
    Ok(inserted)
}

/// All reviews of a parent, by scheduled date
pub async fn list_for_parent<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    parent_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<DbScheduledReview>> {
    let t = tables(kind);
    let sql = format!(
        r#"
        SELECT {returning}
        FROM {reviews} r
        JOIN {parent} p ON p.id = r.{pc}
        WHERE r.{pc} = $1 AND p.user_id = $2
        ORDER BY r.scheduled_date, r.day_offset
        "#,
        returning = returning(&t),
        reviews = t.reviews,
        parent = t.parent,
        pc = t.parent_column,
    );

    let reviews = sqlx::query_as::<_, DbScheduledReview>(&sql)
        .bind(parent_id)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

    Ok(reviews)
}

/// One review, only if it belongs to the parent and the parent to the user
pub async fn get_owned<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    review_id: Uuid,
    parent_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DbScheduledReview>> {
    let t = tables(kind);
    let sql = format!(
        r#"
        SELECT {returning}
        FROM {reviews} r
        JOIN {parent} p ON p.id = r.{pc}
        WHERE r.id = $1 AND r.{pc} = $2 AND p.user_id = $3
        "#,
        returning = returning(&t),
        reviews = t.reviews,
        parent = t.parent,
        pc = t.parent_column,
    );

    let review = sqlx::query_as::<_, DbScheduledReview>(&sql)
        .bind(review_id)
        .bind(parent_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

    Ok(review)
}

/// Overwrite date and completion of an owned review
#[allow(clippy::too_many_arguments)]
pub async fn update_owned<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    review_id: Uuid,
    parent_id: Uuid,
    user_id: Uuid,
    scheduled_date: DateTime<Utc>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
) -> Result<Option<DbScheduledReview>> {
    let t = tables(kind);
    let sql = format!(
        r#"
        UPDATE {reviews} AS r
        SET scheduled_date = $4, completed = $5, completed_at = $6
        FROM {parent} p
        WHERE r.id = $1 AND r.{pc} = $2 AND p.id = r.{pc} AND p.user_id = $3
        RETURNING {returning}
        "#,
        reviews = t.reviews,
        parent = t.parent,
        pc = t.parent_column,
        returning = returning(&t),
    );

    let review = sqlx::query_as::<_, DbScheduledReview>(&sql)
        .bind(review_id)
        .bind(parent_id)
        .bind(user_id)
        .bind(scheduled_date)
        .bind(completed)
        .bind(completed_at)
        .fetch_optional(executor)
        .await?;

    Ok(review)
}

/// Delete an owned review, returns whether a row was removed
pub async fn delete_owned<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    review_id: Uuid,
    parent_id: Uuid,
    user_id: Uuid,
) -> Result<bool> {
    let t = tables(kind);
    let sql = format!(
        r#"
        DELETE FROM {reviews} AS r
        USING {parent} p
        WHERE r.id = $1 AND r.{pc} = $2 AND p.id = r.{pc} AND p.user_id = $3
        "#,
        reviews = t.reviews,
        parent = t.parent,
        pc = t.parent_column,
    );

    let result = sqlx::query(&sql)
        .bind(review_id)
        .bind(parent_id)
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Reviews of one kind for a user inside `[start, end)`
pub async fn list_in_window<'e, E: PgExecutor<'e>>(
    executor: E,
    kind: ReviewKind,
    user_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbCalendarReview>> {
    let t = tables(kind);
    let sql = format!(
        r#"
        SELECT r.id, r.{pc} AS parent_id, p.{label} AS parent_label, p.language,
               r.scheduled_date, r.day_offset, r.completed, r.completed_at
        FROM {reviews} r
        JOIN {parent} p ON p.id = r.{pc}
        WHERE p.user_id = $1 AND r.scheduled_date >= $2 AND r.scheduled_date < $3
        ORDER BY r.scheduled_date
        "#,
        pc = t.parent_column,
        label = t.label_column,
        reviews = t.reviews,
        parent = t.parent,
    );

    let reviews = sqlx::query_as::<_, DbCalendarReview>(&sql)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;

    Ok(reviews)
}
