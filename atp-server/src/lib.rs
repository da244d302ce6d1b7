//! atp-server library - Workflow Coordinator
//!
//! Sequences "parse → reconstruct → plan" over HTTP for the calculator UI.
//! Holds no state between requests; handlers share only immutable settings.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use atp_common::config::TomlConfig;
use atp_common::ReconstructOptions;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Stoplist extensions for the reconstructor
    pub parser: Arc<ReconstructOptions>,
    /// OCR confidence below which parses carry a warning
    pub low_confidence_threshold: f64,
    /// Target used when a request omits `targetPercent`
    pub default_target_percent: f64,
}

impl AppState {
    /// Create application state from bootstrap configuration
    pub fn new(config: &TomlConfig) -> Self {
        Self {
            parser: Arc::new(config.reconstruct_options()),
            low_confidence_threshold: config.parser.low_confidence_threshold,
            default_target_percent: config.planner.default_target_percent,
        }
    }
}

/// Build application router
///
/// Route paths match the ones the calculator UI calls.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/parse_table", post(api::parse_table))
        .route("/calculate", post(api::calculate))
        .route("/plan", post(api::plan_from_text))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // The UI is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
