use crate::builder::build_profile;
use crate::cache_store::CacheStore;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CanonicalCompanyProfile, RawSourceBundle};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Single-slot-per-entity profile cache.
    pub profile_cache: CacheStore,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "canonical-profile-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/companies/:id/profile
///
/// Resolves a canonical company profile from the caller-supplied source
/// bundle. The caller is responsible for fetching the snapshots from their
/// respective upstreams; this endpoint only merges them. Served from the
/// cache when the bundle is unchanged and the slot is fresh, recomputed and
/// overwritten otherwise.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `id` - Company entity id; partitions the cache, never influences
///   field resolution.
/// * `bundle` - Up to three optional source snapshots.
pub async fn resolve_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(bundle): Json<RawSourceBundle>,
) -> Result<Json<CanonicalCompanyProfile>, AppError> {
    tracing::info!(
        "POST /companies/{}/profile (extraction: {}, enrichment: {}, questionnaire: {})",
        id,
        bundle.extraction.is_some(),
        bundle.enrichment.is_some(),
        bundle.questionnaire.is_some()
    );

    if id.is_nil() {
        return Err(AppError::BadRequest(
            "Company id must not be the nil UUID".to_string(),
        ));
    }

    if bundle.is_empty() {
        // Valid input, e.g. prior to onboarding completion: every field
        // resolves to absent
        tracing::debug!("All sources absent for {}", id);
    }

    let profile = state
        .profile_cache
        .resolve(&id.to_string(), &bundle, build_profile);

    Ok(Json(profile))
}

/// GET /api/v1/companies/:id/profile/cached
///
/// Read-only view of the last resolved profile for a company, served only
/// while the cache slot is within its TTL. Without the source bundle the
/// fingerprint cannot be checked, so this returns whatever the last
/// resolution produced, or 404 when the slot is empty or expired.
pub async fn get_cached_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CanonicalCompanyProfile>, AppError> {
    tracing::info!("GET /companies/{}/profile/cached", id);

    state
        .profile_cache
        .peek(&id.to_string())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No cached profile for company {}", id)))
}
