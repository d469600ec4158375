//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Every knob has a typed field and a default except the CMS read-only token,
//! which the community list cannot load without. Parsing goes through a
//! lookup closure so tests can feed a map instead of mutating the process
//! environment.

use std::time::Duration;

use crate::page::FailurePolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTH_URL: &str = "https://alurakut-imersao-react-omega.vercel.app/api/auth";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CMS_GRAPHQL_URL: &str = "https://graphql.datocms.com/";
pub const DEFAULT_CMS_MANAGEMENT_URL: &str = "https://site-api.datocms.com";
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 2000;
pub const DEFAULT_VIEW_TTL_SECS: u64 = 900;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Env var holding the CMS read-only API token.
pub const CMS_READ_TOKEN_VAR: &str = "NEXT_PUBLIC_READ_ONLY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Credentials for creating records through the CMS management API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsWriteConfig {
    pub base_url: String,
    pub token: String,
    pub community_model_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub auth_url: String,
    pub github_api_url: String,
    pub cms_graphql_url: String,
    pub cms_read_token: String,
    /// `None` disables `POST /api/comunidades`.
    pub cms_write: Option<CmsWriteConfig>,
    /// Base URL the submission handler uses to reach this site's API routes.
    pub site_url: String,
    /// Shared secret for verifying `USER_TOKEN` signatures.
    pub token_secret: Option<String>,
    pub reveal_delay: Duration,
    pub failure_policy: FailurePolicy,
    pub view_ttl: Duration,
    pub timeouts: HttpTimeouts,
}

impl AppConfig {
    /// Build typed config from the process environment (after loading `.env`).
    ///
    /// Required:
    /// - `NEXT_PUBLIC_READ_ONLY`
    ///
    /// Optional:
    /// - `PORT`, `AUTH_URL`, `GITHUB_API_URL`, `CMS_GRAPHQL_URL`
    /// - `CMS_MANAGEMENT_URL`, `CMS_FULL_ACCESS_TOKEN`, `CMS_COMMUNITY_MODEL_ID`
    /// - `SITE_URL`: defaults to `http://127.0.0.1:{PORT}`
    /// - `USER_TOKEN_SECRET`
    /// - `REVEAL_DELAY_MS` (2000), `FETCH_FAILURE_POLICY` (`keep-loading`)
    /// - `VIEW_TTL_SECS` (900), `HTTP_TIMEOUT_SECS` (30), `HTTP_CONNECT_TIMEOUT_SECS` (10)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the read-only token is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let cms_read_token = get(CMS_READ_TOKEN_VAR).ok_or(ConfigError::Missing(CMS_READ_TOKEN_VAR))?;

        let cms_write = match (get("CMS_FULL_ACCESS_TOKEN"), get("CMS_COMMUNITY_MODEL_ID")) {
            (Some(token), Some(community_model_id)) => Some(CmsWriteConfig {
                base_url: base_url(get("CMS_MANAGEMENT_URL"), DEFAULT_CMS_MANAGEMENT_URL),
                token,
                community_model_id,
            }),
            _ => None,
        };

        let site_url = base_url(get("SITE_URL"), &format!("http://127.0.0.1:{port}"));

        Ok(Self {
            port,
            auth_url: get("AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_owned()),
            github_api_url: base_url(get("GITHUB_API_URL"), DEFAULT_GITHUB_API_URL),
            cms_graphql_url: get("CMS_GRAPHQL_URL").unwrap_or_else(|| DEFAULT_CMS_GRAPHQL_URL.to_owned()),
            cms_read_token,
            cms_write,
            site_url,
            token_secret: get("USER_TOKEN_SECRET"),
            reveal_delay: Duration::from_millis(parse_or(
                "REVEAL_DELAY_MS",
                get("REVEAL_DELAY_MS"),
                DEFAULT_REVEAL_DELAY_MS,
            )?),
            failure_policy: parse_failure_policy(get("FETCH_FAILURE_POLICY").as_deref())?,
            view_ttl: Duration::from_secs(parse_or("VIEW_TTL_SECS", get("VIEW_TTL_SECS"), DEFAULT_VIEW_TTL_SECS)?),
            timeouts: HttpTimeouts {
                request_secs: parse_or("HTTP_TIMEOUT_SECS", get("HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?,
                connect_secs: parse_or(
                    "HTTP_CONNECT_TIMEOUT_SECS",
                    get("HTTP_CONNECT_TIMEOUT_SECS"),
                    DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
                )?,
            },
        })
    }
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_owned()
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid { var, value }),
    }
}

fn parse_failure_policy(raw: Option<&str>) -> Result<FailurePolicy, ConfigError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        None | Some("keep-loading" | "keep_loading") => Ok(FailurePolicy::KeepLoading),
        Some("show-error" | "show_error") => Ok(FailurePolicy::ShowError),
        Some(other) => Err(ConfigError::Invalid { var: "FETCH_FAILURE_POLICY", value: other.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
