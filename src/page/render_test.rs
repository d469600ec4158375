use super::*;
use crate::page::state::{DISPLAY_LIMIT, FailurePolicy};
use uuid::Uuid;

fn follower(i: usize) -> Follower {
    Follower {
        login: format!("user{i}"),
        avatar_url: format!("https://avatars.example.com/{i}"),
        html_url: format!("https://github.com/user{i}"),
    }
}

fn ready_state(followers: usize) -> PageState {
    let mut state = PageState::new(Uuid::nil(), "alice");
    let generation = state.followers.begin();
    state.followers.accept(generation, (0..followers).map(follower).collect());
    state.followers.reveal(generation);
    let generation = state.communities.begin();
    state.communities.accept(
        generation,
        vec![Community {
            id: "1".into(),
            title: "Cats".into(),
            image_url: "http://x/cat.png".into(),
            creator_slug: "alice".into(),
        }],
    );
    state.communities.reveal(generation);
    state
}

#[test]
fn escape_html_covers_markup_characters() {
    assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn loading_page_shows_spinners_and_zero_counts() {
    let html = render_page(&PageState::new(Uuid::nil(), "alice"));
    assert!(html.contains("Comunidades (0)"));
    assert!(html.contains("Pessoas da comunidade (0)"));
    assert_eq!(html.matches("class=\"spinner\"").count(), 2);
    assert!(html.contains("<script>"));
}

#[test]
fn ready_page_truncates_followers_to_six() {
    let html = render_page(&ready_state(9));
    assert!(html.contains("Pessoas da comunidade (9)"));
    assert!(html.contains("user5"));
    assert!(!html.contains("user6"));
    assert!(!html.contains("class=\"spinner\""));
    assert!(!html.contains("<script>"));
}

#[test]
fn item_count_is_min_of_len_and_six() {
    for n in [0, 3, 6, 7, 12] {
        let html = render_page(&ready_state(n));
        let followers = html.matches("target=\"_blank\"").count();
        assert_eq!(followers, n.min(DISPLAY_LIMIT), "n = {n}");
    }
}

#[test]
fn community_links_are_local() {
    let html = render_page(&ready_state(0));
    assert!(html.contains("<a href=\"#\"><img src=\"http://x/cat.png\""));
    assert!(html.contains("<span>Cats</span>"));
    assert!(html.contains("Comunidades (1)"));
}

#[test]
fn profile_sidebar_uses_github_user() {
    let html = render_page(&ready_state(0));
    assert!(html.contains("https://github.com/alice.png"));
    assert!(html.contains("@alice"));
    assert!(html.contains("Bem vindo(a), alice"));
}

#[test]
fn user_controlled_text_is_escaped() {
    let mut state = PageState::new(Uuid::nil(), "<script>alert(1)</script>");
    state.submit = SubmitState::Rejected { reason: "<b>".into() };
    let html = render_page(&state);
    assert!(!html.contains("<script>alert(1)"));
    assert!(html.contains("&lt;script&gt;alert(1)"));
    assert!(html.contains("&lt;b&gt;"));
}

#[test]
fn submit_button_reflects_state() {
    let mut state = ready_state(0);
    assert!(render_page(&state).contains("<button>Criar comunidade</button>"));
    state.submit = SubmitState::Submitting;
    assert!(render_page(&state).contains("<button disabled>Aguarde...</button>"));
}

#[test]
fn form_posts_to_view_route() {
    let html = render_page(&ready_state(0));
    assert!(html.contains(&format!("action=\"/api/views/{}/communities\"", Uuid::nil())));
    assert!(html.contains("name=\"title\""));
    assert!(html.contains("name=\"image\""));
}

#[test]
fn failed_relation_shows_message() {
    let mut state = ready_state(0);
    let generation = state.followers.begin();
    state
        .followers
        .fail(generation, "unexpected status 404".into(), FailurePolicy::ShowError);
    let html = render_page(&state);
    assert!(html.contains("class=\"loadError\">unexpected status 404"));
}

#[test]
fn notices_render_as_toasts() {
    let mut state = ready_state(0);
    state.push_notice("Comunidade adicionada!");
    let html = render_page(&state);
    assert!(html.contains("class=\"toast\" data-notice-id=\"1\">Comunidade adicionada!"));
}
