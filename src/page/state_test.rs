use super::*;

fn numbers(n: usize) -> Vec<usize> {
    (0..n).collect()
}

// =============================================================================
// Relation
// =============================================================================

#[test]
fn new_relation_is_loading_and_empty() {
    let rel: Relation<usize> = Relation::new();
    assert!(rel.is_loading());
    assert_eq!(rel.header_count(), 0);
    assert!(rel.visible().is_empty());
}

#[test]
fn accept_keeps_loading_until_reveal() {
    let mut rel = Relation::new();
    let generation = rel.begin();
    assert!(rel.accept(generation, numbers(3)));
    assert!(rel.is_loading());
    assert_eq!(rel.header_count(), 0);

    assert!(rel.reveal(generation));
    assert_eq!(rel.phase, LoadPhase::Ready);
    assert_eq!(rel.header_count(), 3);
    assert_eq!(rel.visible(), &[0, 1, 2]);
}

#[test]
fn visible_truncates_to_display_limit() {
    for n in [0, 1, 5, 6, 7, 40] {
        let mut rel = Relation::new();
        let generation = rel.begin();
        rel.accept(generation, numbers(n));
        rel.reveal(generation);
        assert_eq!(rel.visible().len(), n.min(DISPLAY_LIMIT), "n = {n}");
        assert_eq!(rel.header_count(), n, "n = {n}");
    }
}

#[test]
fn stale_generation_is_dropped() {
    let mut rel = Relation::new();
    let first = rel.begin();
    let second = rel.begin();
    assert!(rel.accept(second, numbers(2)));
    assert!(!rel.accept(first, numbers(9)));
    assert!(!rel.reveal(first));
    assert!(rel.is_loading());
    assert!(rel.reveal(second));
    assert_eq!(rel.items, numbers(2));
}

#[test]
fn reveal_twice_is_noop() {
    let mut rel: Relation<usize> = Relation::new();
    let generation = rel.begin();
    assert!(rel.reveal(generation));
    assert!(!rel.reveal(generation));
}

#[test]
fn fail_keep_loading_leaves_spinner() {
    let mut rel: Relation<usize> = Relation::new();
    let generation = rel.begin();
    assert!(!rel.fail(generation, "boom".into(), FailurePolicy::KeepLoading));
    assert!(rel.is_loading());
}

#[test]
fn fail_show_error_moves_to_failed() {
    let mut rel: Relation<usize> = Relation::new();
    let generation = rel.begin();
    assert!(rel.fail(generation, "boom".into(), FailurePolicy::ShowError));
    assert_eq!(rel.phase, LoadPhase::Failed { message: "boom".into() });
    assert_eq!(rel.header_count(), 0);
}

#[test]
fn begin_after_ready_returns_to_loading() {
    let mut rel = Relation::new();
    let generation = rel.begin();
    rel.accept(generation, numbers(1));
    rel.reveal(generation);
    rel.begin();
    assert!(rel.is_loading());
    assert_eq!(rel.items.len(), 1);
}

#[test]
fn relation_serializes_phase_inline() {
    let mut rel = Relation::new();
    let generation = rel.begin();
    rel.accept(generation, vec![1_u8]);
    rel.reveal(generation);
    let value = serde_json::to_value(&rel).unwrap();
    assert_eq!(value, serde_json::json!({ "items": [1], "phase": "ready" }));
}

// =============================================================================
// PageState
// =============================================================================

#[test]
fn page_state_starts_idle_and_loading() {
    let state = PageState::new(Uuid::nil(), "alice");
    assert_eq!(state.github_user, "alice");
    assert!(state.followers.is_loading());
    assert!(state.communities.is_loading());
    assert_eq!(state.submit, SubmitState::Idle);
    assert!(!state.is_submitting());
    assert!(state.notices.is_empty());
}

#[test]
fn notices_get_increasing_ids() {
    let mut state = PageState::new(Uuid::nil(), "alice");
    let a = state.push_notice("one");
    let b = state.push_notice("two");
    assert!(b > a);
    assert_eq!(state.notices.len(), 2);
    assert_eq!(state.notices[1].message, "two");
}

#[test]
fn submit_state_serializes_tagged() {
    let value = serde_json::to_value(SubmitState::Rejected { reason: "title".into() }).unwrap();
    assert_eq!(value, serde_json::json!({ "state": "rejected", "reason": "title" }));
}

#[test]
fn take_notices_drains_pending() {
    let mut state = PageState::new(Uuid::nil(), "alice");
    state.push_notice("one");
    let taken = state.take_notices();
    assert_eq!(taken.len(), 1);
    assert!(state.notices.is_empty());
    assert!(state.take_notices().is_empty());
    assert_eq!(state.push_notice("two"), 2);
}
