//! Page-view state consumed by the renderer and the snapshot endpoint.
//!
//! DESIGN
//! ======
//! A [`Relation`] owns one displayed collection and its load phase. Each load
//! bumps a generation counter; completions carrying an older generation are
//! dropped so a slow initial load cannot overwrite a newer reload.

use serde::Serialize;
use uuid::Uuid;

use crate::services::cms::Community;
use crate::services::github::Follower;

/// Maximum number of items a relation box displays.
pub const DISPLAY_LIMIT: usize = 6;

/// What a failed fetch does to its relation's load phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stay in `Loading`; the spinner keeps turning.
    #[default]
    KeepLoading,
    /// Move to `Failed` so the page can show an error.
    ShowError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Relation<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub phase: LoadPhase,
    #[serde(skip)]
    generation: u64,
}

impl<T> Relation<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new(), phase: LoadPhase::Loading, generation: 0 }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// Count shown next to the box title: zero until the relation is revealed.
    #[must_use]
    pub fn header_count(&self) -> usize {
        match self.phase {
            LoadPhase::Ready => self.items.len(),
            LoadPhase::Loading | LoadPhase::Failed { .. } => 0,
        }
    }

    /// Items the box displays: the first [`DISPLAY_LIMIT`], or none while loading.
    #[must_use]
    pub fn visible(&self) -> &[T] {
        match self.phase {
            LoadPhase::Ready => &self.items[..self.items.len().min(DISPLAY_LIMIT)],
            LoadPhase::Loading | LoadPhase::Failed { .. } => &[],
        }
    }

    /// Start a load. Returns the generation the completion must present.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        self.generation
    }

    /// Replace the collection; the relation stays `Loading` until [`Relation::reveal`].
    pub(crate) fn accept(&mut self, generation: u64, items: Vec<T>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.items = items;
        true
    }

    pub(crate) fn reveal(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.is_loading() {
            return false;
        }
        self.phase = LoadPhase::Ready;
        true
    }

    pub(crate) fn fail(&mut self, generation: u64, message: String, policy: FailurePolicy) -> bool {
        if generation != self.generation {
            return false;
        }
        match policy {
            FailurePolicy::KeepLoading => false,
            FailurePolicy::ShowError => {
                self.phase = LoadPhase::Failed { message };
                true
            }
        }
    }
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Rejected {
        reason: String,
    },
}

/// A transient notification ("toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageState {
    pub view_id: Uuid,
    pub github_user: String,
    pub followers: Relation<Follower>,
    pub communities: Relation<Community>,
    pub submit: SubmitState,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    next_notice_id: u64,
}

impl PageState {
    #[must_use]
    pub fn new(view_id: Uuid, github_user: impl Into<String>) -> Self {
        Self {
            view_id,
            github_user: github_user.into(),
            followers: Relation::new(),
            communities: Relation::new(),
            submit: SubmitState::Idle,
            notices: Vec::new(),
            next_notice_id: 1,
        }
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submit == SubmitState::Submitting
    }

    pub(crate) fn push_notice(&mut self, message: impl Into<String>) -> u64 {
        let id = self.next_notice_id;
        self.next_notice_id += 1;
        self.notices.push(Notice { id, message: message.into() });
        id
    }

    /// Remove and return pending notices. Each notice is shown once.
    pub(crate) fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
