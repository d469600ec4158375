//! Profile page routes: the authenticated page itself and its view endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

use crate::page::{CommunityForm, PageState, ProfilePage, SubmitError, render_page};
use crate::services::auth::{self, SESSION_COOKIE, Verdict};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

fn login_redirect() -> Response {
    Redirect::temporary(LOGIN_PATH).into_response()
}

fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(Cookie::value).filter(|t| !t.is_empty())
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

pub(crate) fn submit_error_to_status(err: &SubmitError) -> StatusCode {
    match err {
        SubmitError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmitError::AlreadySubmitting => StatusCode::CONFLICT,
        SubmitError::Publish(_) => StatusCode::BAD_GATEWAY,
    }
}

async fn owned_view(state: &AppState, jar: &CookieJar, view_id: Uuid) -> Result<ProfilePage, StatusCode> {
    let token = session_token(jar).ok_or(StatusCode::UNAUTHORIZED)?;
    state.view_for(view_id, token).await.ok_or(StatusCode::NOT_FOUND)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /` — verify the session, then open a view and render it.
///
/// Nothing is fetched for followers or communities unless the auth service
/// affirmatively authenticated the token and its payload names a user.
pub async fn profile_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = match auth::verify(state.auth.as_ref(), session_token(&jar)).await {
        Verdict::Proceed { token } => token,
        Verdict::MissingToken => {
            tracing::debug!("no session cookie, redirecting to login");
            return login_redirect();
        }
        Verdict::Rejected => {
            tracing::info!("session rejected by auth service");
            return login_redirect();
        }
        Verdict::Unavailable(e) => {
            tracing::warn!(error = %e, "auth service unavailable");
            return login_redirect();
        }
    };

    let claims = match state.identity.decode(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "session token payload rejected");
            return login_redirect();
        }
    };

    tracing::info!(github_user = %claims.github_user, "profile page authenticated");
    let page = state.open_view(&claims.github_user, &token).await;
    Html(render_page(&page.present().await)).into_response()
}

/// `GET /views/{id}` — re-render an open view without refetching anything.
pub async fn view_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(view_id): Path<Uuid>,
) -> Result<Html<String>, StatusCode> {
    let page = owned_view(&state, &jar, view_id).await?;
    Ok(Html(render_page(&page.present().await)))
}

/// `GET /api/views/{id}` — JSON snapshot of an open view. Pending notices are
/// delivered once, here or in a rendered page, whichever comes first.
pub async fn view_snapshot(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(view_id): Path<Uuid>,
) -> Result<Json<PageState>, StatusCode> {
    let page = owned_view(&state, &jar, view_id).await?;
    Ok(Json(page.present().await))
}

/// `POST /api/views/{id}/communities` — run the creation form handler.
///
/// Browsers get a `303` back to the view; `Accept: application/json` callers
/// get the resulting snapshot or an error status.
pub async fn submit_community(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(view_id): Path<Uuid>,
    headers: HeaderMap,
    Form(form): Form<CommunityForm>,
) -> Response {
    let page = match owned_view(&state, &jar, view_id).await {
        Ok(page) => page,
        Err(status) => return status.into_response(),
    };

    let result = page.submit(form).await;
    if !wants_json(&headers) {
        return Redirect::to(&format!("/views/{view_id}")).into_response();
    }

    match result {
        Ok(()) => Json(page.present().await).into_response(),
        Err(e) => {
            let status = submit_error_to_status(&e);
            (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// `DELETE /api/views/{id}` — close a view and abort its loaders.
pub async fn close_view(State(state): State<AppState>, jar: CookieJar, Path(view_id): Path<Uuid>) -> StatusCode {
    if let Err(status) = owned_view(&state, &jar, view_id).await {
        return status;
    }
    state.close_view(view_id).await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
