use std::{fmt::Write as _, sync::Arc};

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};
use shared::domain::{Room, RoomId, RoomStatus};

use crate::{
    app_state::AppState,
    context::RequestContext,
    layout::render_page,
    pipeline::{or_empty, require, PageExit},
    views::{escape, money},
};

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/rooms", get(rooms))
        .route("/rooms/:id", get(room_detail))
}

async fn home(State(state): State<Arc<AppState>>, ctx: RequestContext) -> Html<String> {
    let actions = state.actions.as_ref();
    let (rooms, activities, services) = futures::join!(
        actions.get_all_rooms(),
        actions.get_all_activities(),
        actions.get_all_services(),
    );
    let rooms = or_empty("rooms", rooms);
    let activities = or_empty("activities", activities);
    let services = or_empty("services", services);

    let mut body = String::from(
        "<section class=\"hero\">\n<h1>Stay by the harbor</h1>\n\
         <p>Bright rooms, a roof terrace and breakfast whenever you wake up.</p>\n\
         <a class=\"button\" href=\"/rooms\">See rooms</a>\n</section>\n",
    );

    let featured: Vec<&Room> = rooms
        .iter()
        .filter(|room| room.status == RoomStatus::Available)
        .take(3)
        .collect();
    if !featured.is_empty() {
        body.push_str("<section class=\"featured\">\n<h2>Available now</h2>\n");
        for room in featured {
            body.push_str(&room_card(room));
        }
        body.push_str("</section>\n");
    }

    if !activities.is_empty() {
        body.push_str("<section class=\"activities\">\n<h2>What's on</h2>\n<ul>\n");
        for activity in &activities {
            let _ = writeln!(
                body,
                "<li><strong>{}</strong> {} at {}</li>",
                escape(&activity.title),
                activity.starts_at.format("%b %-d, %H:%M"),
                escape(&activity.location)
            );
        }
        body.push_str("</ul>\n</section>\n");
    }

    if !services.is_empty() {
        body.push_str("<section class=\"services\">\n<h2>Services</h2>\n<ul>\n");
        for service in &services {
            let _ = writeln!(
                body,
                "<li>{} <span class=\"price\">{}</span></li>",
                escape(&service.name),
                money(service.price)
            );
        }
        body.push_str("</ul>\n</section>\n");
    }

    render_page(&ctx, "Welcome", &body)
}

async fn rooms(State(state): State<Arc<AppState>>, ctx: RequestContext) -> Html<String> {
    let rooms = or_empty("rooms", state.actions.get_all_rooms().await);

    let mut body = String::from("<h1>Our rooms</h1>\n");
    if rooms.is_empty() {
        body.push_str("<p class=\"empty\">No rooms to show right now.</p>\n");
    }
    for room in &rooms {
        body.push_str(&room_card(room));
    }
    render_page(&ctx, "Rooms", &body)
}

async fn room_detail(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Html<String>, PageExit> {
    let room = require("room", state.actions.get_room_by_id(&RoomId(id)).await)?;

    let mut body = format!(
        "<article class=\"room-detail\">\n<h1>Room {}</h1>\n<p class=\"type\">{}</p>\n\
         <p>{}</p>\n<dl><dt>Price</dt><dd>{} per night</dd><dt>Sleeps</dt><dd>{}</dd>\
         <dt>Status</dt><dd>{}</dd></dl>\n",
        escape(&room.number),
        escape(&room.room_type),
        escape(&room.description),
        money(room.price_per_night),
        room.capacity,
        room.status,
    );
    if room.status == RoomStatus::Available {
        let _ = writeln!(body, "<a class=\"button\" href=\"/book/{}\">Book this room</a>", escape(room.id.as_str()));
    }
    body.push_str("</article>");
    Ok(render_page(&ctx, &format!("Room {}", room.number), &body))
}

fn room_card(room: &Room) -> String {
    let id = escape(room.id.as_str());
    format!(
        "<article class=\"room-card\">\n<h3><a href=\"/rooms/{id}\">Room {}</a></h3>\n\
         <p>{}, sleeps {}</p>\n<p class=\"price\">{} per night</p>\n</article>\n",
        escape(&room.number),
        escape(&room.room_type),
        room.capacity,
        money(room.price_per_night),
    )
}
