//! Community creation route.
//!
//! `POST /api/comunidades` is the target the submission handler publishes to.
//! It forwards the record to the CMS management API when write credentials
//! are configured.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::services::cms::NewCommunity;
use crate::state::AppState;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `POST /api/comunidades` — create one community record.
pub async fn create_community(State(state): State<AppState>, Json(body): Json<NewCommunity>) -> Response {
    let Some(store) = state.store.as_ref() else {
        tracing::warn!("community creation requested but CMS write access is not configured");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "community storage is not configured");
    };

    let record = NewCommunity {
        title: body.title.trim().to_owned(),
        image_url: body.image_url.trim().to_owned(),
        creator_slug: body.creator_slug.trim().to_owned(),
    };
    if record.title.is_empty() || record.image_url.is_empty() || record.creator_slug.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "title, imageUrl and creatorSlug are required");
    }

    match store.create(&record).await {
        Ok(community) => {
            tracing::info!(id = %community.id, title = %community.title, "community created");
            Json(json!({ "community": community })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, title = %record.title, "community creation failed");
            error_response(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "communities_test.rs"]
mod tests;
