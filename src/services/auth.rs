//! Session-token verification against the remote auth endpoint.
//!
//! ERROR HANDLING
//! ==============
//! Only an affirmative `isAuthenticated: true` lets a request through. A
//! negative answer and an unreachable service both end in the login redirect,
//! but they are kept apart in [`Verdict`] so logs can tell them apart.

use async_trait::async_trait;
use serde::Deserialize;

/// Cookie holding the session token minted by the external login flow.
pub const SESSION_COOKIE: &str = "USER_TOKEN";

/// Body returned by the auth endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Request(String),
    #[error("auth response parse failed (status {status}): {body}")]
    Parse { status: u16, body: String },
}

/// Remote check of a raw session token.
#[async_trait]
pub trait AuthCheck: Send + Sync {
    /// Ask the auth service whether `token` belongs to a live session.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the service cannot be reached or its
    /// answer cannot be read.
    async fn check(&self, token: &str) -> Result<AuthResult, AuthError>;
}

/// HTTP client for `GET <auth-service>/api/auth`.
pub struct RemoteAuth {
    http: reqwest::Client,
    url: String,
}

impl RemoteAuth {
    #[must_use]
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }
}

#[async_trait]
impl AuthCheck for RemoteAuth {
    async fn check(&self, token: &str) -> Result<AuthResult, AuthError> {
        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        // The endpoint reports rejection in the body, so the status alone is
        // not decisive.
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;
        parse_auth_result(status, &body)
    }
}

pub(crate) fn parse_auth_result(status: u16, body: &str) -> Result<AuthResult, AuthError> {
    serde_json::from_str::<AuthResult>(body).map_err(|_| AuthError::Parse { status, body: body.to_owned() })
}

/// Outcome of verifying one page load.
#[derive(Debug)]
pub enum Verdict {
    /// Render the page for this token.
    Proceed { token: String },
    /// No `USER_TOKEN` cookie (or an empty one); no outbound call was made.
    MissingToken,
    /// The auth service answered and did not authenticate the token.
    Rejected,
    /// The auth service could not be consulted.
    Unavailable(AuthError),
}

impl Verdict {
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }
}

/// Decide whether a page load may proceed.
///
/// Issues at most one call to `checker`, and none when the token is absent.
pub async fn verify(checker: &dyn AuthCheck, token: Option<&str>) -> Verdict {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Verdict::MissingToken;
    };

    match checker.check(token).await {
        Ok(AuthResult { is_authenticated: true }) => Verdict::Proceed { token: token.to_owned() },
        Ok(_) => Verdict::Rejected,
        Err(e) => Verdict::Unavailable(e),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
