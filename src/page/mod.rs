//! Profile page view: explicit state, loading lifecycle, and rendering.

pub mod lifecycle;
pub mod render;
pub mod state;

pub use lifecycle::{CommunityForm, PageDeps, PageOptions, ProfilePage, SubmitError};
pub use render::render_page;
pub use state::{FailurePolicy, PageState};
