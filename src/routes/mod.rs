//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the profile page, the per-view endpoints its poll script
//! and form talk to, and the community creation route under a single Axum
//! router.

pub mod communities;
pub mod profile;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::services::site::COMMUNITIES_ROUTE;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(COMMUNITIES_ROUTE, post(communities::create_community))
        .layer(cors);

    Router::new()
        .route("/", get(profile::profile_page))
        .route("/views/{id}", get(profile::view_page))
        .route(
            "/api/views/{id}",
            get(profile::view_snapshot).delete(profile::close_view),
        )
        .route("/api/views/{id}/communities", post(profile::submit_community))
        .route("/healthz", get(healthz))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
