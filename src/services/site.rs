//! Client for this site's own community-creation route.

use async_trait::async_trait;

use super::cms::NewCommunity;
use super::{SourceError, read_success_body};

pub const COMMUNITIES_ROUTE: &str = "/api/comunidades";

/// Hands a new community to the creation route.
#[async_trait]
pub trait CommunityPublisher: Send + Sync {
    /// POST `community` as JSON. Success means the route answered 2xx.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on transport failure or non-success status.
    async fn publish(&self, community: &NewCommunity) -> Result<(), SourceError>;
}

pub struct SiteClient {
    http: reqwest::Client,
    base_url: String,
}

impl SiteClient {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    #[must_use]
    pub fn communities_url(&self) -> String {
        format!("{}{COMMUNITIES_ROUTE}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CommunityPublisher for SiteClient {
    async fn publish(&self, community: &NewCommunity) -> Result<(), SourceError> {
        let response = self
            .http
            .post(self.communities_url())
            .json(community)
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        read_success_body(response).await.map(|_| ())
    }
}
