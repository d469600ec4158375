//! HTML rendering of a page view.
//!
//! Pure function of [`PageState`]; no I/O. The inline script polls the view
//! snapshot while a relation is still loading and reloads the view once
//! something changes.

use std::fmt::Write;

use super::state::{LoadPhase, PageState, Relation, SubmitState};
use crate::services::cms::Community;
use crate::services::github::Follower;

pub const COMMUNITIES_TITLE: &str = "Comunidades";
pub const FOLLOWERS_TITLE: &str = "Pessoas da comunidade";

/// Escape text for HTML element content and double-quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One entry of a relation box.
trait RelationItem {
    fn href(&self) -> &str;
    fn image(&self) -> &str;
    fn label(&self) -> &str;
    fn external(&self) -> bool;
}

impl RelationItem for Follower {
    fn href(&self) -> &str {
        &self.html_url
    }
    fn image(&self) -> &str {
        &self.avatar_url
    }
    fn label(&self) -> &str {
        &self.login
    }
    fn external(&self) -> bool {
        true
    }
}

impl RelationItem for Community {
    fn href(&self) -> &str {
        "#"
    }
    fn image(&self) -> &str {
        &self.image_url
    }
    fn label(&self) -> &str {
        &self.title
    }
    fn external(&self) -> bool {
        false
    }
}

/// Render the complete profile page for `state`.
#[must_use]
pub fn render_page(state: &PageState) -> String {
    let user = escape_html(&state.github_user);
    let view_id = state.view_id;
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>Alurakut | {user}</title>");
    html.push_str("</head>\n<body>\n");

    for notice in &state.notices {
        let _ = writeln!(
            html,
            "<div class=\"toast\" data-notice-id=\"{}\">{}</div>",
            notice.id,
            escape_html(&notice.message)
        );
    }

    html.push_str("<main class=\"mainGrid\">\n");

    // Profile sidebar.
    let _ = write!(
        html,
        "<div class=\"profileArea\"><aside class=\"box\">\
         <img src=\"https://github.com/{user}.png\" style=\"border-radius: 8px\" alt=\"{user}\"><hr>\
         <p><a class=\"boxLink\" href=\"https://github.com/{user}\">@{user}</a></p><hr>\
         </aside></div>\n"
    );

    // Welcome and creation form.
    let _ = writeln!(
        html,
        "<div class=\"welcomeArea\"><div class=\"box\"><h1 class=\"title\">Bem vindo(a), {user}</h1></div>"
    );
    html.push_str("<div class=\"box\"><h2 class=\"subTitle\">O que você deseja fazer?</h2>\n");
    let _ = writeln!(html, "<form method=\"post\" action=\"/api/views/{view_id}/communities\">");
    html.push_str(
        "<div><input placeholder=\"Qual vai ser o nome da sua comunidade?\" name=\"title\" \
         aria-label=\"Qual vai ser o nome da sua comunidade?\" type=\"text\"></div>\n\
         <div><input placeholder=\"Coloque uma URL para usarmos de capa\" name=\"image\" \
         aria-label=\"Coloque uma URL para usarmos de capa\"></div>\n",
    );
    html.push_str(&submit_button(&state.submit));
    html.push_str("</form></div></div>\n");

    // Relation boxes.
    html.push_str("<div class=\"profileRelationsArea\">\n");
    html.push_str(&render_relation(COMMUNITIES_TITLE, &state.communities));
    html.push_str(&render_relation(FOLLOWERS_TITLE, &state.followers));
    html.push_str("</div>\n</main>\n");

    if state.followers.is_loading() || state.communities.is_loading() {
        let rendered = format!("{}/{}", phase_name(&state.followers.phase), phase_name(&state.communities.phase));
        let _ = writeln!(html, "<script>{}</script>", poll_script(view_id, &rendered));
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn submit_button(submit: &SubmitState) -> String {
    match submit {
        SubmitState::Submitting => "<button disabled>Aguarde...</button>\n".to_owned(),
        SubmitState::Rejected { reason } => format!(
            "<p class=\"formError\">{}</p>\n<button>Criar comunidade</button>\n",
            escape_html(reason)
        ),
        SubmitState::Idle => "<button>Criar comunidade</button>\n".to_owned(),
    }
}

fn render_relation<T: RelationItem>(title: &str, relation: &Relation<T>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<div class=\"box profileRelationsBox\"><h2 class=\"smallTitle\">{} ({})</h2>",
        escape_html(title),
        relation.header_count()
    );
    out.push_str("<ul>\n");
    match &relation.phase {
        LoadPhase::Loading => out.push_str("<li class=\"spinner\" aria-busy=\"true\"></li>\n"),
        LoadPhase::Failed { message } => {
            let _ = writeln!(out, "<li class=\"loadError\">{}</li>", escape_html(message));
        }
        LoadPhase::Ready => {
            for item in relation.visible() {
                let target = if item.external() { " target=\"_blank\"" } else { "" };
                let _ = writeln!(
                    out,
                    "<li><a href=\"{}\"{target}><img src=\"{}\" alt=\"\"><span>{}</span></a></li>",
                    escape_html(item.href()),
                    escape_html(item.image()),
                    escape_html(item.label())
                );
            }
        }
    }
    out.push_str("</ul></div>\n");
    out
}

fn phase_name(phase: &LoadPhase) -> &'static str {
    match phase {
        LoadPhase::Loading => "loading",
        LoadPhase::Ready => "ready",
        LoadPhase::Failed { .. } => "failed",
    }
}

fn poll_script(view_id: uuid::Uuid, rendered: &str) -> String {
    format!(
        "(function(){{var seen='{rendered}';function tick(){{fetch('/api/views/{view_id}',{{credentials:'same-origin'}})\
         .then(function(r){{return r.ok?r.json():null;}}).then(function(s){{if(!s)return;\
         var key=s.followers.phase+'/'+s.communities.phase;if(key!==seen){{location.replace('/views/{view_id}');return;}}\
         setTimeout(tick,500);}});}}tick();}})();"
    )
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
