//! Calendar read API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures::{self, noon};
use common::TestContext;

#[tokio::test]
#[ignore = "requires database"]
async fn test_calendar_groups_both_kinds_by_day() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let auth = TestContext::auth_header_value(&token);

    let set = ctx.create_set_at(user_id, "es", noon(2024, 1, 1)).await;
    let generated: serde_json::Value = server
        .post(&format!("/api/sets/{}/reviews", set.id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_reviews_request(Some(vec![1, 5])))
        .await
        .json();
    let first_review = generated["reviews"][0]["id"].as_str().unwrap().to_string();

    server
        .put(&format!("/api/sets/{}/reviews", set.id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "reviewId": first_review, "completed": true }))
        .await
        .assert_status_ok();

    let module_id = fixtures::unique_module_id("es-a1-estar");
    server
        .post(&format!("/api/grammar/{}/complete", module_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::complete_grammar_request("es", "A1"))
        .await
        .assert_status_ok();
    sqlx::query("UPDATE grammar_progress SET created_at = $1 WHERE user_id = $2")
        .bind(noon(2024, 1, 1))
        .bind(user_id)
        .execute(ctx.db.pool())
        .await
        .unwrap();
    server
        .post(&format!("/api/grammar/{}/reviews", module_id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_reviews_request(Some(vec![1])))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/reviews")
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-01-10")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["from"], "2024-01-01");
    assert_eq!(body["to"], "2024-01-10");
    assert_eq!(body["totalPending"], 2);

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 2);

    assert_eq!(days[0]["date"], "2024-01-02");
    assert_eq!(days[0]["totalCount"], 2);
    assert_eq!(days[0]["pendingCount"], 1);
    let kinds: Vec<&str> = days[0]["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["kind"].as_str().unwrap())
        .collect();
    assert!(kinds.contains(&"set"));
    assert!(kinds.contains(&"grammar"));

    assert_eq!(days[1]["date"], "2024-01-06");
    assert_eq!(days[1]["pendingCount"], 1);
    assert_eq!(days[1]["reviews"][0]["parentLabel"], "Test set");
    assert_eq!(days[1]["reviews"][0]["language"], "es");

    ctx.cleanup_user(user_id).await;
}

/// The `to` bound is inclusive and days outside the window are left out.
#[tokio::test]
#[ignore = "requires database"]
async fn test_calendar_window_bounds() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let auth = TestContext::auth_header_value(&token);

    let set = ctx.create_set_at(user_id, "es", noon(2024, 1, 1)).await;
    server
        .post(&format!("/api/sets/{}/reviews", set.id))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_reviews_request(Some(vec![1, 5, 15])))
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/reviews")
        .add_query_param("from", "2024-01-06")
        .add_query_param("to", "2024-01-06")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await
        .json();

    let days = body["days"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["date"], "2024-01-06");
    assert_eq!(body["totalPending"], 1);

    ctx.cleanup_user(user_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_calendar_excludes_other_users() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user(Some("owner")).await;
    let (viewer_id, viewer_token) = ctx.create_test_user(Some("viewer")).await;

    let set = ctx.create_set_at(owner_id, "es", noon(2024, 1, 1)).await;
    server
        .post(&format!("/api/sets/{}/reviews", set.id))
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&owner_token),
        )
        .await
        .assert_status_ok();

    let body: serde_json::Value = server
        .get("/api/reviews")
        .add_query_param("from", "2024-01-01")
        .add_query_param("to", "2024-12-31")
        .add_header(
            axum::http::header::AUTHORIZATION,
            TestContext::auth_header_value(&viewer_token),
        )
        .await
        .json();

    assert!(body["days"].as_array().unwrap().is_empty());
    assert_eq!(body["totalPending"], 0);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(viewer_id).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_calendar_rejects_bad_range() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user(None).await;
    let auth = TestContext::auth_header_value(&token);

    let reversed = server
        .get("/api/reviews")
        .add_query_param("from", "2024-02-01")
        .add_query_param("to", "2024-01-01")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await;
    reversed.assert_status(StatusCode::BAD_REQUEST);

    let malformed = server
        .get("/api/reviews")
        .add_query_param("from", "01/02/2024")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);

    for (name, value) in [("from", "+262142-12-31"), ("to", "+262142-12-31")] {
        let overflowing = server
            .get("/api/reviews")
            .add_query_param(name, value)
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .await;
        overflowing.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = overflowing.json();
        assert_eq!(body["error"], "validation_error");
    }

    // Defaults: today through 30 days later
    let defaults = server
        .get("/api/reviews")
        .add_header(axum::http::header::AUTHORIZATION, auth)
        .await;
    defaults.assert_status_ok();
    let body: serde_json::Value = defaults.json();
    let today = chrono::Utc::now().date_naive();
    assert_eq!(body["from"], today.format("%Y-%m-%d").to_string());
    assert_eq!(
        body["to"],
        (today + chrono::Duration::days(30)).format("%Y-%m-%d").to_string()
    );

    ctx.cleanup_user(user_id).await;
}
