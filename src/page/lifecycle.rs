//! Data-loading lifecycle of one profile page view.
//!
//! SYSTEM CONTEXT
//! ==============
//! A view is created only after the token verifier let the request through.
//! Mounting starts the follower and community loaders as independent tasks;
//! they race and each touches only its own relation. The submission handler
//! posts a new community and, on success, starts one more community load.
//!
//! TIMING
//! ======
//! A successful load replaces the collection at once but keeps the spinner up
//! for `reveal_delay` before flipping the relation to ready.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use super::state::{FailurePolicy, PageState, Relation, SubmitState};
use crate::services::SourceError;
use crate::services::cms::{Community, CommunitySource, NewCommunity};
use crate::services::github::{Follower, FollowerSource};
use crate::services::site::CommunityPublisher;

pub const SUBMIT_SUCCESS_NOTICE: &str = "👏 Comunidade adicionada!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub reveal_delay: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self { reveal_delay: Duration::from_secs(2), failure_policy: FailurePolicy::KeepLoading }
    }
}

/// Remote collaborators a view loads from and submits to.
#[derive(Clone)]
pub struct PageDeps {
    pub followers: Arc<dyn FollowerSource>,
    pub communities: Arc<dyn CommunitySource>,
    pub publisher: Arc<dyn CommunityPublisher>,
    pub options: PageOptions,
}

/// Raw fields of the community creation form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("publish failed: {0}")]
    Publish(#[from] SourceError),
}

/// Handle to one page view. Clones share the same view.
#[derive(Clone)]
pub struct ProfilePage {
    inner: Arc<PageInner>,
}

struct PageInner {
    state: RwLock<PageState>,
    deps: PageDeps,
    /// Raw session token the view was opened with.
    token: String,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    last_seen: Mutex<Instant>,
}

impl ProfilePage {
    #[must_use]
    pub fn new(view_id: Uuid, github_user: impl Into<String>, token: impl Into<String>, deps: PageDeps) -> Self {
        Self {
            inner: Arc::new(PageInner {
                state: RwLock::new(PageState::new(view_id, github_user)),
                deps,
                token: token.into(),
                tasks: Mutex::new(Vec::new()),
                last_seen: Mutex::new(Instant::now()),
            }),
        }
    }

    #[must_use]
    pub fn owned_by(&self, token: &str) -> bool {
        self.inner.token == token
    }

    /// Start both loaders. Call once, right after the view is created.
    pub fn mount(&self) {
        self.spawn_followers();
        self.spawn_communities();
    }

    pub fn spawn_followers(&self) {
        let page = self.clone();
        self.track(tokio::spawn(async move { page.load_followers().await }));
    }

    pub fn spawn_communities(&self) {
        let page = self.clone();
        self.track(tokio::spawn(async move { page.load_communities().await }));
    }

    /// Load the follower list of the view's user.
    pub async fn load_followers(&self) {
        let (generation, github_user) = {
            let mut state = self.inner.state.write().await;
            (state.followers.begin(), state.github_user.clone())
        };
        let result = self.inner.deps.followers.followers(&github_user).await;
        self.settle(generation, result, followers_of, "followers").await;
    }

    /// Load every community from the CMS.
    pub async fn load_communities(&self) {
        let generation = self.inner.state.write().await.communities.begin();
        self.fetch_communities(generation).await;
    }

    /// Fetch communities for a load already begun at `generation`.
    async fn fetch_communities(&self, generation: u64) {
        let result = self.inner.deps.communities.communities().await;
        self.settle(generation, result, communities_of, "communities").await;
    }

    fn spawn_community_fetch(&self, generation: u64) {
        let page = self.clone();
        self.track(tokio::spawn(async move { page.fetch_communities(generation).await }));
    }

    async fn settle<T>(
        &self,
        generation: u64,
        result: Result<Vec<T>, SourceError>,
        relation: fn(&mut PageState) -> &mut Relation<T>,
        what: &'static str,
    ) {
        let options = self.inner.deps.options;
        match result {
            Ok(items) => {
                let count = items.len();
                if !relation(&mut *self.inner.state.write().await).accept(generation, items) {
                    tracing::debug!(what, generation, "dropping stale load result");
                    return;
                }
                tracing::debug!(what, count, "load complete");
                tokio::time::sleep(options.reveal_delay).await;
                relation(&mut *self.inner.state.write().await).reveal(generation);
            }
            Err(e) => {
                tracing::error!(what, error = %e, "load failed");
                let message = e.to_string();
                relation(&mut *self.inner.state.write().await).fail(generation, message, options.failure_policy);
            }
        }
    }

    /// Handle one submission of the creation form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::AlreadySubmitting`] while another submission is
    /// in flight, [`SubmitError::MissingField`] when `title` or `image` is
    /// blank (nothing is posted), and [`SubmitError::Publish`] when the
    /// creation route fails.
    pub async fn submit(&self, form: CommunityForm) -> Result<(), SubmitError> {
        let record = {
            let mut state = self.inner.state.write().await;
            if state.is_submitting() {
                return Err(SubmitError::AlreadySubmitting);
            }
            state.submit = SubmitState::Submitting;

            let title = form.title.trim();
            let image = form.image.trim();
            let missing = if title.is_empty() {
                Some("title")
            } else if image.is_empty() {
                Some("image")
            } else {
                None
            };
            if let Some(field) = missing {
                state.submit = SubmitState::Rejected { reason: format!("{field} is required") };
                return Err(SubmitError::MissingField(field));
            }

            NewCommunity {
                title: title.to_owned(),
                image_url: image.to_owned(),
                creator_slug: state.github_user.clone(),
            }
        };

        let result = self.inner.deps.publisher.publish(&record).await;

        let mut state = self.inner.state.write().await;
        state.submit = SubmitState::Idle;
        match result {
            Ok(()) => {
                state.push_notice(SUBMIT_SUCCESS_NOTICE);
                // The reload is visible as loading before this call returns.
                let generation = state.communities.begin();
                drop(state);
                tracing::info!(title = %record.title, creator = %record.creator_slug, "community submitted");
                self.spawn_community_fetch(generation);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "community submission failed");
                Err(SubmitError::Publish(e))
            }
        }
    }

    /// Copy of the current state. Pending notices stay pending.
    pub async fn snapshot(&self) -> PageState {
        self.inner.state.read().await.clone()
    }

    /// Copy of the current state for display. Pending notices move into the
    /// copy, so each one is shown exactly once.
    pub async fn present(&self) -> PageState {
        let mut state = self.inner.state.write().await;
        let notices = state.take_notices();
        let mut shown = state.clone();
        shown.notices = notices;
        shown
    }

    /// Mark the view as used now.
    pub fn touch(&self) {
        if let Ok(mut seen) = self.inner.last_seen.lock() {
            *seen = Instant::now();
        }
    }

    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.inner
            .last_seen
            .lock()
            .map(|seen| seen.elapsed())
            .unwrap_or_default()
    }

    /// Abort every loader still running for this view.
    pub fn close(&self) {
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            tasks.retain(|t| !t.is_finished());
            tasks.push(handle);
        }
    }
}

fn followers_of(state: &mut PageState) -> &mut Relation<Follower> {
    &mut state.followers
}

fn communities_of(state: &mut PageState) -> &mut Relation<Community> {
    &mut state.communities
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
