//! JSON endpoints answering with the `{success, data, message}` envelope.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use shared::{
    domain::{BookingId, RoomId},
    protocol::ActionResult,
};

use crate::{app_state::AppState, context::RequestContext};

pub(crate) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rooms", get(rooms))
        .route("/api/rooms/:id", get(room))
        .route("/api/activities", get(activities))
        .route("/api/services", get(services))
        .route("/api/bookings/:id", get(booking))
}

pub(crate) fn envelope_response<T: Serialize>(result: ActionResult<T>) -> Response {
    let status = match &result {
        ActionResult::Ok(_) => StatusCode::OK,
        ActionResult::NotFound => StatusCode::NOT_FOUND,
        ActionResult::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(result.into_envelope())).into_response()
}

async fn rooms(State(state): State<Arc<AppState>>) -> Response {
    envelope_response(state.actions.get_all_rooms().await)
}

async fn room(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    envelope_response(state.actions.get_room_by_id(&RoomId(id)).await)
}

async fn activities(State(state): State<Arc<AppState>>) -> Response {
    envelope_response(state.actions.get_all_activities().await)
}

async fn services(State(state): State<Arc<AppState>>) -> Response {
    envelope_response(state.actions.get_all_services().await)
}

/// Guests may only read their own bookings; others look missing.
async fn booking(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    let Some(session) = &ctx.session else {
        let body = ActionResult::<()>::failed("authentication required").into_envelope();
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    };

    let result = match state.actions.get_booking_by_id(&BookingId(id)).await {
        ActionResult::Ok(booking)
            if !session.role.is_staff() && booking.user_id != session.user_id =>
        {
            ActionResult::NotFound
        }
        other => other,
    };
    envelope_response(result)
}
