mod builder;
mod cache_store;
mod config;
mod errors;
mod fingerprint;
mod handlers;
mod keywords;
mod models;
mod narrative;
mod normalizer;
mod precedence;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache_store::{CacheStore, MokaBackend};
use crate::config::Config;

/// Main entry point for the application.
///
/// Initializes logging, configuration, and the profile cache, then starts
/// the Axum server with the resolution endpoints.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canonical_profile_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Create the profile cache: one slot per entity, validated on read
    // against TTL and bundle fingerprint
    let backend = Arc::new(MokaBackend::new(config.cache_capacity));
    let profile_cache = CacheStore::new(backend, config.cache_ttl_hours);
    tracing::info!(
        "Profile cache initialized ({}h TTL, {} slots)",
        config.cache_ttl_hours,
        config.cache_capacity
    );

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        profile_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route(
            "/api/v1/companies/:id/profile",
            post(handlers::resolve_profile),
        )
        .route(
            "/api/v1/companies/:id/profile/cached",
            get(handlers::get_cached_profile),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 5MB max payload (source bundles carry
                // whole extraction snapshots)
                .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
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
