use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use shared::{
    domain::{Booking, BookingId, BookingStatus, Room, RoomId, UserId},
    protocol::{ActionResult, BookingInput},
};
use tracing::{info, warn};

use super::{dashboard_page, notice_href, NoticeQuery};
use crate::{
    app_state::AppState,
    context::RequestContext,
    layout::render_page,
    pipeline::{load_pair, or_empty, require, require_both, PageExit},
    session::Session,
    views::{escape, money, Field, FieldKind, FormMode, FormView, ListRow, ListView},
};

const BOOKINGS: &str = "/dashboard/bookings";

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(BOOKINGS, get(list).post(create))
        .route("/dashboard/bookings/new", get(new_form))
        .route("/dashboard/bookings/:id", post(update))
        .route("/dashboard/bookings/:id/edit", get(edit_form))
        .route("/dashboard/bookings/:id/delete", post(delete))
        .route("/book/:room_id", get(book_form).post(book))
}

async fn list(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let actions = state.actions.as_ref();
    let (bookings, rooms) = load_pair(actions.get_all_bookings(), actions.get_all_rooms()).await;
    let bookings = or_empty("bookings", bookings);
    let rooms = or_empty("rooms", rooms);

    let view = booking_table(
        "Bookings",
        &bookings,
        &rooms,
        true,
        query.notice,
    );
    Ok(dashboard_page(&ctx, session, "bookings", "Bookings", &view.render()).into_response())
}

async fn new_form(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let rooms = or_empty("rooms", state.actions.get_all_rooms().await);
    let view = booking_form(FormMode::Create, BOOKINGS.to_string(), session, &rooms, None, None);
    Ok(render_dashboard_form(&ctx, session, &view, StatusCode::OK))
}

async fn edit_form(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let actions = state.actions.as_ref();
    let id = BookingId(id);
    let (booking, rooms) = require_both(
        ("booking", "rooms"),
        load_pair(actions.get_booking_by_id(&id), actions.get_all_rooms()).await,
    )?;

    let input = booking_input(&booking);
    let mut view = booking_form(
        FormMode::Edit,
        format!("{BOOKINGS}/{}", booking.id),
        session,
        &rooms,
        Some(&input),
        None,
    );
    view.description = format!(
        "Update the details for the booking of {} ({} nights).",
        booking.guest_name,
        booking.nights()
    );
    Ok(render_dashboard_form(&ctx, session, &view, StatusCode::OK))
}

async fn create(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    form: Result<Form<BookingInput>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let (input, result) = match form {
        Ok(Form(input)) => {
            let result = state.actions.create_booking(&session.user_id, &input).await;
            (Some(input), result)
        }
        Err(rejection) => (None, ActionResult::failed(rejection.body_text())),
    };

    match result {
        ActionResult::Ok(booking) => {
            info!(user = %session.user_id, booking = %booking.id, room = %booking.room_id, "booking created");
            Ok(Redirect::to(BOOKINGS).into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, %reason, "booking rejected");
            let rooms = or_empty("rooms", state.actions.get_all_rooms().await);
            let view = booking_form(
                FormMode::Create,
                BOOKINGS.to_string(),
                session,
                &rooms,
                input.as_ref(),
                Some(reason),
            );
            Ok(render_dashboard_form(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

async fn update(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
    form: Result<Form<BookingInput>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let id = BookingId(id);
    let (input, result) = match form {
        Ok(Form(input)) => {
            let result = state.actions.update_booking(&id, &input).await;
            (Some(input), result)
        }
        Err(rejection) => (None, ActionResult::failed(rejection.body_text())),
    };

    match result {
        ActionResult::Ok(booking) => {
            info!(user = %session.user_id, booking = %booking.id, status = %booking.status, "booking updated");
            Ok(Redirect::to(BOOKINGS).into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, booking = %id, %reason, "booking update rejected");
            let rooms = or_empty("rooms", state.actions.get_all_rooms().await);
            let view = booking_form(
                FormMode::Edit,
                format!("{BOOKINGS}/{id}"),
                session,
                &rooms,
                input.as_ref(),
                Some(reason),
            );
            Ok(render_dashboard_form(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

async fn delete(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Redirect, PageExit> {
    let session = ctx.require_staff()?;
    let id = BookingId(id);
    match state.actions.delete_booking(&id).await {
        ActionResult::Ok(()) => {
            info!(user = %session.user_id, booking = %id, "booking deleted");
            Ok(Redirect::to(BOOKINGS))
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => Ok(Redirect::to(&notice_href(BOOKINGS, &reason))),
    }
}

/// Guest-facing booking form for one room.
async fn book_form(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(room_id): Path<String>,
) -> Result<Response, PageExit> {
    let session = ctx.require_session()?;
    let room = require("room", state.actions.get_room_by_id(&RoomId(room_id)).await)?;
    Ok(render_book_page(&ctx, session, &room, None, None, StatusCode::OK))
}

async fn book(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(room_id): Path<String>,
    form: Result<Form<BookingInput>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_session()?;
    let (input, result) = match form {
        Ok(Form(mut input)) => {
            input.room_id = room_id.clone();
            input.status = None;
            let result = state.actions.create_booking(&session.user_id, &input).await;
            (Some(input), result)
        }
        Err(rejection) => (None, ActionResult::failed(rejection.body_text())),
    };

    match result {
        ActionResult::Ok(booking) => {
            info!(user = %session.user_id, booking = %booking.id, room = %booking.room_id, "guest booked a stay");
            Ok(Redirect::to("/dashboard").into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, room = %room_id, %reason, "guest booking rejected");
            let room = require("room", state.actions.get_room_by_id(&RoomId(room_id)).await)?;
            Ok(render_book_page(
                &ctx,
                session,
                &room,
                input.as_ref(),
                Some(reason),
                StatusCode::UNPROCESSABLE_ENTITY,
            ))
        }
    }
}

fn render_book_page(
    ctx: &RequestContext,
    session: &Session,
    room: &Room,
    values: Option<&BookingInput>,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    let view = FormView {
        entity: "Booking",
        mode: FormMode::Create,
        description: format!(
            "Room {} ({}), {} per night, sleeps {}.",
            room.number,
            room.room_type,
            money(room.price_per_night),
            room.capacity
        ),
        action: format!("/book/{}", room.id),
        cancel_href: format!("/rooms/{}", room.id),
        fields: vec![
            user_id_field(&session.user_id),
            Field::new("room_id", "", FieldKind::Hidden).value(room.id.as_str()),
            Field::new("guest_name", "Name on the booking", FieldKind::Text)
                .value(values.map_or_else(|| session.name.clone(), |v| v.guest_name.clone())),
            Field::new("check_in", "Check-in", FieldKind::Date)
                .value_from(values, |v| v.check_in.to_string()),
            Field::new("check_out", "Check-out", FieldKind::Date)
                .value_from(values, |v| v.check_out.to_string()),
            Field::new("guests_count", "Guests", FieldKind::Number { step: "1" })
                .value(values.map_or_else(|| "1".to_string(), |v| v.guests_count.to_string())),
        ],
        error,
    };
    let page = render_page(ctx, &format!("Book room {}", room.number), &view.render());
    (status, page).into_response()
}

fn render_dashboard_form(
    ctx: &RequestContext,
    session: &Session,
    view: &FormView,
    status: StatusCode,
) -> Response {
    let page = dashboard_page(ctx, session, "bookings", &view.heading(), &view.render());
    (status, page).into_response()
}

fn booking_form(
    mode: FormMode,
    action: String,
    session: &Session,
    rooms: &[Room],
    values: Option<&BookingInput>,
    error: Option<String>,
) -> FormView {
    let room_options = rooms
        .iter()
        .map(|room| {
            (
                room.id.0.clone(),
                format!("Room {} ({}, sleeps {})", room.number, room.room_type, room.capacity),
            )
        })
        .collect();
    let status_options = BookingStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), status.as_str().replace('_', " ")))
        .collect();

    FormView {
        entity: "Booking",
        mode,
        description: String::new(),
        action,
        cancel_href: BOOKINGS.to_string(),
        fields: vec![
            user_id_field(&session.user_id),
            Field::new("room_id", "Room", FieldKind::Select(room_options))
                .value_from(values, |v| v.room_id.clone()),
            Field::new("guest_name", "Guest name", FieldKind::Text)
                .value_from(values, |v| v.guest_name.clone()),
            Field::new("check_in", "Check-in", FieldKind::Date)
                .value_from(values, |v| v.check_in.to_string()),
            Field::new("check_out", "Check-out", FieldKind::Date)
                .value_from(values, |v| v.check_out.to_string()),
            Field::new("guests_count", "Guests", FieldKind::Number { step: "1" })
                .value_from(values, |v| v.guests_count.to_string()),
            Field::new("status", "Status", FieldKind::Select(status_options)).value(
                values
                    .and_then(|v| v.status)
                    .unwrap_or(BookingStatus::Pending)
                    .as_str(),
            ),
        ],
        error,
    }
}

/// The session user, carried along for the record; handlers still use the session itself.
fn user_id_field(user_id: &UserId) -> Field {
    Field::new("user_id", "", FieldKind::Hidden).value(user_id.as_str())
}

fn booking_input(booking: &Booking) -> BookingInput {
    BookingInput {
        room_id: booking.room_id.0.clone(),
        guest_name: booking.guest_name.clone(),
        check_in: booking.check_in,
        check_out: booking.check_out,
        guests_count: booking.guests_count,
        status: Some(booking.status),
    }
}

/// Table of bookings with room numbers resolved; `manage` adds edit/delete links.
pub(super) fn booking_table(
    heading: &str,
    bookings: &[Booking],
    rooms: &[Room],
    manage: bool,
    notice: Option<String>,
) -> ListView {
    let numbers: HashMap<&RoomId, &str> = rooms
        .iter()
        .map(|room| (&room.id, room.number.as_str()))
        .collect();

    ListView {
        heading: heading.to_string(),
        new_href: manage.then(|| format!("{BOOKINGS}/new")),
        columns: vec!["Guest", "Room", "Check-in", "Check-out", "Nights", "Guests", "Status"],
        rows: bookings
            .iter()
            .map(|booking| ListRow {
                cells: vec![
                    escape(&booking.guest_name),
                    escape(numbers.get(&booking.room_id).copied().unwrap_or(booking.room_id.as_str())),
                    booking.check_in.to_string(),
                    booking.check_out.to_string(),
                    booking.nights().to_string(),
                    booking.guests_count.to_string(),
                    booking.status.to_string(),
                ],
                edit_href: manage.then(|| format!("{BOOKINGS}/{}/edit", booking.id)),
                delete_href: manage.then(|| format!("{BOOKINGS}/{}/delete", booking.id)),
            })
            .collect(),
        empty_text: "No bookings yet.".to_string(),
        notice,
    }
}
