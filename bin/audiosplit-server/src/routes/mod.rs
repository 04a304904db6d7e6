//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint
//!   (disable with `AUDIOSPLIT_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - The `/api` job routes (upload, status polling, downloads)

pub mod api;
pub mod doc;
mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api::router());

    // Swagger UI is enabled by default; disable in production to avoid
    // exposing the API structure.
    if state.config.enable_swagger {
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()),
        );
    }

    // A mix request can carry several files; the request-level body limit
    // budgets for `max_batch_files` maximum-size uploads plus multipart
    // framing, while the per-file cap is enforced during streaming.
    let body_limit = state
        .config
        .max_upload_bytes()
        .saturating_mul(state.config.max_batch_files.max(1))
        .saturating_add(1024 * 1024);

    app.layer(cors::cors_layer(state.clone()))
        .layer(middleware::from_fn(trace::trace_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
