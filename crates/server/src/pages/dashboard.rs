use std::{fmt::Write as _, sync::Arc};

use axum::{extract::State, response::Html, routing::get, Router};
use shared::domain::RoomStatus;

use super::{bookings::booking_table, dashboard_page};
use crate::{
    app_state::AppState,
    context::RequestContext,
    pipeline::{load_pair, or_empty, PageExit},
    views::escape,
};

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(overview))
}

async fn overview(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Html<String>, PageExit> {
    let session = ctx.require_session()?;
    let actions = state.actions.as_ref();

    let mut content = format!("<h1>Welcome back, {}</h1>\n", escape(&session.name));
    if session.role.is_staff() {
        let (bookings, rooms, guests) = futures::join!(
            actions.get_all_bookings(),
            actions.get_all_rooms(),
            actions.get_all_guests(),
        );
        let bookings = or_empty("bookings", bookings);
        let rooms = or_empty("rooms", rooms);
        let guests = or_empty("guests", guests);

        let available = rooms
            .iter()
            .filter(|room| room.status == RoomStatus::Available)
            .count();
        let _ = write!(
            content,
            "<ul class=\"stats\">\n<li><strong>{}</strong> bookings</li>\n\
             <li><strong>{available}</strong> of {} rooms available</li>\n\
             <li><strong>{}</strong> guests on file</li>\n</ul>\n",
            bookings.len(),
            rooms.len(),
            guests.len(),
        );
        content.push_str(&booking_table("Recent bookings", &bookings, &rooms, true, None).render());
    } else {
        let (bookings, rooms) = load_pair(
            actions.get_bookings_for_user(&session.user_id),
            actions.get_all_rooms(),
        )
        .await;
        let bookings = or_empty("bookings", bookings);
        let rooms = or_empty("rooms", rooms);
        content.push_str("<p><a class=\"button\" href=\"/rooms\">Book a room</a></p>\n");
        content.push_str(&booking_table("Your stays", &bookings, &rooms, false, None).render());
    }

    Ok(dashboard_page(&ctx, session, "", "Dashboard", &content))
}
