mod config;
mod page;
mod routes;
mod services;
mod state;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::page::PageOptions;
use crate::services::auth::RemoteAuth;
use crate::services::cms::{CommunityStore, DatoGraphQl, DatoManagement};
use crate::services::github::GitHubClient;
use crate::services::identity::IdentityDecoder;
use crate::services::site::SiteClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let http = services::build_http_client(config.timeouts).expect("http client init failed");

    let identity = IdentityDecoder::new(config.token_secret.as_deref());
    if !identity.verifies_signature() {
        tracing::warn!("USER_TOKEN_SECRET not set, session token signatures are not verified");
    }

    // Creation route is disabled if CMS write credentials are missing.
    let store: Option<Arc<dyn CommunityStore>> = match config.cms_write.clone() {
        Some(write) => {
            tracing::info!(model = %write.community_model_id, "CMS write access configured");
            Some(Arc::new(DatoManagement::new(http.clone(), write)))
        }
        None => {
            tracing::warn!("CMS write access not configured, community creation disabled");
            None
        }
    };

    let state = state::AppState {
        auth: Arc::new(RemoteAuth::new(http.clone(), config.auth_url.clone())),
        identity: Arc::new(identity),
        followers: Arc::new(GitHubClient::new(http.clone(), config.github_api_url.clone())),
        communities: Arc::new(DatoGraphQl::new(
            http.clone(),
            config.cms_graphql_url.clone(),
            config.cms_read_token.clone(),
        )),
        publisher: Arc::new(SiteClient::new(http, config.site_url.clone())),
        store,
        page_options: PageOptions { reveal_delay: config.reveal_delay, failure_policy: config.failure_policy },
        views: Arc::new(RwLock::new(HashMap::new())),
    };

    // Spawn background eviction of idle views.
    let _sweeper = services::sweep::spawn_view_sweeper(state.clone(), config.view_ttl);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "alurakut listening");
    axum::serve(listener, app).await.expect("server failed");
}
