//! DatoCMS clients: GraphQL reads and management-API writes for communities.
//!
//! DESIGN
//! ======
//! Reads go through the public GraphQL endpoint with the read-only token.
//! Writes go through the management API with a full-access token and are only
//! used by the `POST /api/comunidades` route, never by the page itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SourceError, read_success_body};
use crate::config::CmsWriteConfig;

pub const ALL_COMMUNITIES_QUERY: &str = "{ allCommunities { id title imageUrl creatorSlug } }";

const CMS_API_VERSION: &str = "3";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub creator_slug: String,
}

/// A community as submitted by the creation form, before the CMS assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommunity {
    pub title: String,
    pub image_url: String,
    pub creator_slug: String,
}

#[async_trait]
pub trait CommunitySource: Send + Sync {
    /// Fetch every community, in CMS order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on transport failure, non-success status,
    /// GraphQL errors, or an unexpected body.
    async fn communities(&self) -> Result<Vec<Community>, SourceError>;
}

#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Persist a new community and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the CMS refuses or cannot be reached.
    async fn create(&self, community: &NewCommunity) -> Result<Community, SourceError>;
}

// =============================================================================
// GRAPHQL READS
// =============================================================================

pub struct DatoGraphQl {
    http: reqwest::Client,
    url: String,
    token: String,
}

impl DatoGraphQl {
    #[must_use]
    pub fn new(http: reqwest::Client, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { http, url: url.into(), token: token.into() }
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllCommunities {
    all_communities: Vec<Community>,
}

#[async_trait]
impl CommunitySource for DatoGraphQl {
    async fn communities(&self) -> Result<Vec<Community>, SourceError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&GraphQlRequest { query: ALL_COMMUNITIES_QUERY })
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let body = read_success_body(response).await?;
        parse_all_communities(&body)
    }
}

pub(crate) fn parse_all_communities(body: &str) -> Result<Vec<Community>, SourceError> {
    let parsed: GraphQlResponse<AllCommunities> =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    if !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.into_iter().map(|e| e.message).collect();
        return Err(SourceError::GraphQl(messages.join("; ")));
    }
    parsed
        .data
        .map(|d| d.all_communities)
        .ok_or_else(|| SourceError::Parse("response has no data".into()))
}

// =============================================================================
// MANAGEMENT API WRITES
// =============================================================================

pub struct DatoManagement {
    http: reqwest::Client,
    config: CmsWriteConfig,
}

impl DatoManagement {
    #[must_use]
    pub fn new(http: reqwest::Client, config: CmsWriteConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl CommunityStore for DatoManagement {
    async fn create(&self, community: &NewCommunity) -> Result<Community, SourceError> {
        let response = self
            .http
            .post(format!("{}/items", self.config.base_url))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/vnd.api+json")
            .header("X-Api-Version", CMS_API_VERSION)
            .body(create_item_body(&self.config.community_model_id, community).to_string())
            .send()
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        let body = read_success_body(response).await?;
        parse_created_item(&body)
    }
}

/// JSON:API document creating one record of the community item type.
pub(crate) fn create_item_body(model_id: &str, community: &NewCommunity) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "type": "item",
            "attributes": {
                "title": community.title,
                "image_url": community.image_url,
                "creator_slug": community.creator_slug,
            },
            "relationships": {
                "item_type": {
                    "data": { "type": "item_type", "id": model_id }
                }
            }
        }
    })
}

#[derive(Deserialize)]
struct ItemDocument {
    data: Item,
}

#[derive(Deserialize)]
struct Item {
    id: String,
    attributes: ItemAttributes,
}

#[derive(Deserialize)]
struct ItemAttributes {
    title: String,
    image_url: String,
    creator_slug: String,
}

pub(crate) fn parse_created_item(body: &str) -> Result<Community, SourceError> {
    let doc: ItemDocument = serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    Ok(Community {
        id: doc.data.id,
        title: doc.data.attributes.title,
        image_url: doc.data.attributes.image_url,
        creator_slug: doc.data.attributes.creator_slug,
    })
}

#[cfg(test)]
#[path = "cms_test.rs"]
mod tests;
