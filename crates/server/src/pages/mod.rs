use std::sync::Arc;

use axum::{response::Html, Router};

use crate::{app_state::AppState, context::RequestContext, layout, session::Session, views};

mod auth;
mod bookings;
mod dashboard;
mod messages;
mod public;
mod resources;

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(public::routes())
        .merge(auth::routes())
        .merge(dashboard::routes())
        .merge(bookings::routes())
        .merge(messages::routes())
        .merge(resources::routes::<resources::Rooms>())
        .merge(resources::routes::<resources::Guests>())
        .merge(resources::routes::<resources::StaffMembers>())
        .merge(resources::routes::<resources::Activities>())
        .merge(resources::routes::<resources::Services>())
}

/// Wraps dashboard content in the sidebar shell and the page layout.
fn dashboard_page(
    ctx: &RequestContext,
    session: &Session,
    active: &str,
    title: &str,
    content: &str,
) -> Html<String> {
    layout::render_page(ctx, title, &views::dashboard_shell(session, active, content))
}

fn notice_href(base: &str, notice: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(notice.as_bytes()).collect();
    format!("{base}?notice={encoded}")
}

#[derive(Debug, Default, serde::Deserialize)]
struct NoticeQuery {
    notice: Option<String>,
}
