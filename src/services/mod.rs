//! Clients for the remote services the profile page depends on.
//!
//! ARCHITECTURE
//! ============
//! Each remote collaborator sits behind an `async_trait` so the page
//! lifecycle and the route handlers can be exercised against in-memory
//! doubles. The concrete clients share one `reqwest::Client` built here.

pub mod auth;
pub mod cms;
pub mod github;
pub mod identity;
pub mod site;
pub mod sweep;

use std::time::Duration;

use crate::config::HttpTimeouts;

const USER_AGENT: &str = concat!("alurakut/", env!("CARGO_PKG_VERSION"));

/// Errors produced while reading from or writing to a remote data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The remote answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A GraphQL endpoint answered 200 with an `errors` array.
    #[error("graphql errors: {0}")]
    GraphQl(String),
}

/// Build the shared outbound HTTP client.
///
/// # Errors
///
/// Returns the underlying `reqwest` error if the TLS backend cannot be
/// initialised.
pub fn build_http_client(timeouts: HttpTimeouts) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
}

/// Read the body of a response, turning non-success statuses into
/// [`SourceError::Status`].
pub(crate) async fn read_success_body(response: reqwest::Response) -> Result<String, SourceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Request(e.to_string()))?;
    if !status.is_success() {
        return Err(SourceError::Status { status: status.as_u16(), body });
    }
    Ok(body)
}
