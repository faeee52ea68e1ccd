pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState { db: Arc::new(db) };
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full router with all routes
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/user/status", get(routes::user::status))
        // Settings routes
        .route(
            "/api/settings",
            get(routes::settings::get).post(routes::settings::update),
        )
        // Set routes
        .route("/api/sets", get(routes::sets::list).post(routes::sets::create))
        .route("/api/sets/{id}/complete", post(routes::sets::complete))
        .route(
            "/api/sets/{id}/reviews",
            get(routes::sets::list_reviews)
                .post(routes::sets::generate_reviews)
                .put(routes::sets::update_review)
                .delete(routes::sets::delete_review),
        )
        // Grammar routes
        .route(
            "/api/grammar/{module_id}/complete",
            post(routes::grammar::complete),
        )
        .route(
            "/api/grammar/{module_id}/reviews",
            get(routes::grammar::list_reviews)
                .post(routes::grammar::generate_reviews)
                .put(routes::grammar::update_review)
                .delete(routes::grammar::delete_review),
        )
        // Calendar
        .route("/api/reviews", get(routes::reviews::calendar))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/user/register", post(routes::user::register))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
