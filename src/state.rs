//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the remote-service clients behind trait objects and the registry of
//! open page views. Each authenticated page load opens exactly one view.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::page::{PageDeps, PageOptions, ProfilePage};
use crate::services::auth::AuthCheck;
use crate::services::cms::{CommunitySource, CommunityStore};
use crate::services::github::FollowerSource;
use crate::services::identity::IdentityDecoder;
use crate::services::site::CommunityPublisher;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthCheck>,
    pub identity: Arc<IdentityDecoder>,
    pub followers: Arc<dyn FollowerSource>,
    pub communities: Arc<dyn CommunitySource>,
    pub publisher: Arc<dyn CommunityPublisher>,
    /// `None` if CMS write credentials are not configured.
    pub store: Option<Arc<dyn CommunityStore>>,
    pub page_options: PageOptions,
    pub views: Arc<RwLock<HashMap<Uuid, ProfilePage>>>,
}

impl AppState {
    /// Create a view for `github_user`, register it, and start its loaders.
    pub async fn open_view(&self, github_user: &str, token: &str) -> ProfilePage {
        let view_id = Uuid::new_v4();
        let deps = PageDeps {
            followers: self.followers.clone(),
            communities: self.communities.clone(),
            publisher: self.publisher.clone(),
            options: self.page_options,
        };
        let page = ProfilePage::new(view_id, github_user, token, deps);
        self.views.write().await.insert(view_id, page.clone());
        page.mount();
        page
    }

    /// Look up a view the caller's session token owns, marking it as used.
    pub async fn view_for(&self, view_id: Uuid, token: &str) -> Option<ProfilePage> {
        let page = self.views.read().await.get(&view_id).cloned()?;
        if !page.owned_by(token) {
            return None;
        }
        page.touch();
        Some(page)
    }

    /// Drop a view and abort its loaders. Returns whether it existed.
    pub async fn close_view(&self, view_id: Uuid) -> bool {
        let removed = self.views.write().await.remove(&view_id);
        match removed {
            Some(page) => {
                page.close();
                true
            }
            None => false,
        }
    }

    /// Close every view idle for longer than `ttl`. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut views = self.views.write().await;
        let stale: Vec<Uuid> = views
            .iter()
            .filter(|(_, page)| page.idle_for() > ttl)
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            if let Some(page) = views.remove(id) {
                page.close();
            }
        }
        stale.len()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
