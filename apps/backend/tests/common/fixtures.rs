//! Test fixtures and factory functions for creating test data.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

/// Noon UTC on the given day, the hour every generated review uses.
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Create a set request body.
pub fn create_set_request(title: &str, language: &str) -> serde_json::Value {
    json!({ "title": title, "language": language })
}

/// Create a regenerate request body.
pub fn generate_reviews_request(review_days: Option<Vec<i64>>) -> serde_json::Value {
    match review_days {
        Some(days) => json!({ "reviewDays": days }),
        None => json!({}),
    }
}

/// Create a single-review update body.
pub fn update_review_request(
    review_id: Uuid,
    scheduled_date: Option<&str>,
    completed: Option<bool>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("reviewId".to_string(), json!(review_id));
    if let Some(d) = scheduled_date {
        obj.insert("scheduledDate".to_string(), json!(d));
    }
    if let Some(c) = completed {
        obj.insert("completed".to_string(), json!(c));
    }
    serde_json::Value::Object(obj)
}

/// Create a grammar completion body.
pub fn complete_grammar_request(language: &str, level: &str) -> serde_json::Value {
    json!({ "language": language, "level": level })
}

/// Create a settings update body.
pub fn update_settings_request(
    default_review_days: Option<Vec<i64>>,
    max_reviews_per_day: Option<i64>,
) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    if let Some(days) = default_review_days {
        obj.insert("defaultReviewDays".to_string(), json!(days));
    }
    if let Some(max) = max_reviews_per_day {
        obj.insert("maxReviewsPerDay".to_string(), json!(max));
    }
    serde_json::Value::Object(obj)
}

/// Scheduled dates of a review list response, as `YYYY-MM-DD`.
pub fn review_days(body: &serde_json::Value) -> Vec<String> {
    body["reviews"]
        .as_array()
        .expect("reviews array")
        .iter()
        .map(|r| r["scheduledDate"].as_str().unwrap()[..10].to_string())
        .collect()
}

/// Generate a unique grammar module id to avoid collisions.
pub fn unique_module_id(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().to_string()[..8])
}
