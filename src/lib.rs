//! Canonical Company Profile Resolution Engine
//!
//! This library merges three independently-maintained, heterogeneously
//! shaped descriptions of a company (document/extraction pipeline,
//! third-party enrichment service, onboarding questionnaire) into one
//! consistent, deduplicated read-model, and caches the result so the merge
//! work is not repeated on every view. The output is pure render data: it
//! is always re-derivable from the sources and is never written back to any
//! system of record.
//!
//! # Modules
//!
//! - `builder`: Pure bundle-to-profile orchestrator.
//! - `cache_store`: TTL + fingerprint invalidated profile cache.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `fingerprint`: Deterministic bundle content fingerprint.
//! - `handlers`: HTTP request handlers.
//! - `keywords`: List-field aggregation and display capping.
//! - `models`: Core data models.
//! - `narrative`: Free-text and insight-bullet deduplication.
//! - `normalizer`: Per-source snapshot adapters.
//! - `precedence`: Per-field source priority resolution.

pub mod builder;
pub mod cache_store;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod narrative;
pub mod normalizer;
pub mod precedence;
