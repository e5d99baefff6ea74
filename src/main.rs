mod circuit_breaker;
mod config;
mod db;
mod db_storage;
mod decision;
mod dedup;
mod errors;
mod handlers;
mod matcher;
mod models;
mod normalizer;
mod risk;
mod scoring;
mod velocity;
mod webhook_handler;
mod webhook_models;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::db_storage::PgLeadStore;
use crate::velocity::MokaVelocity;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the database pool, the velocity
/// counter, and the dedup engine, then starts the Axum server with the
/// usual middleware (CORS, rate limiting, body limit, request tracing).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadfly_dedup_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Lead storage with circuit-breaker-guarded history reads
    let store = PgLeadStore::new(db.pool.clone());

    // In-process submission-velocity counter (one-minute buckets)
    let velocity = MokaVelocity::new();
    tracing::info!("Velocity counter initialized");

    // Build application state (wires the dedup engine to store + velocity)
    let app_state = Arc::new(handlers::AppState::new(store, velocity, config.clone()));

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("valid governor configuration"),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        // Dedup API
        .route("/api/v1/dedup/check", post(handlers::dedup_check))
        // Lead management
        .route(
            "/api/v1/leads",
            post(handlers::create_lead).get(handlers::list_leads),
        )
        .route(
            "/api/v1/leads/:id/status",
            patch(handlers::update_lead_status),
        )
        // Legacy workflow-compatible webhook endpoint
        .route(
            "/webhook/leadfly/duplicate-prevention",
            post(webhook_handler::duplicate_prevention_webhook),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
