//! GitHub followers client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SourceError, read_success_body};

/// One entry of `GET /users/{user}/followers`. Other fields GitHub returns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

#[async_trait]
pub trait FollowerSource: Send + Sync {
    /// Fetch the follower list of `github_user`, in the order GitHub returns it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on transport failure, non-success status, or
    /// an unexpected body.
    async fn followers(&self, github_user: &str) -> Result<Vec<Follower>, SourceError>;
}

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }
}

#[must_use]
pub fn followers_url(base_url: &str, github_user: &str) -> String {
    format!("{}/users/{github_user}/followers", base_url.trim_end_matches('/'))
}

#[async_trait]
impl FollowerSource for GitHubClient {
    async fn followers(&self, github_user: &str) -> Result<Vec<Follower>, SourceError> {
        let response = self
            .http
            .get(followers_url(&self.base_url, github_user))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let body = read_success_body(response).await?;
        parse_followers(&body)
    }
}

pub(crate) fn parse_followers(body: &str) -> Result<Vec<Follower>, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "github_test.rs"]
mod tests;
