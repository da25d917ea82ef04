use shared::{
    domain::{Booking, BookingId, BookingStatus, Room, RoomId, RoomStatus, UserId},
    protocol::{ActionResult, BookingInput},
};
use storage::BookingWrite;
use tracing::info;

use crate::{internal, listing, lookup, removal, ApiContext};

pub async fn get_booking_by_id(ctx: &ApiContext, id: &BookingId) -> ActionResult<Booking> {
    lookup("load booking", ctx.storage.load_booking(id).await)
}

pub async fn get_all_bookings(ctx: &ApiContext) -> ActionResult<Vec<Booking>> {
    listing("list bookings", ctx.storage.list_bookings().await)
}

pub async fn get_bookings_for_user(ctx: &ApiContext, user_id: &UserId) -> ActionResult<Vec<Booking>> {
    listing(
        "list bookings",
        ctx.storage.list_bookings_for_user(user_id).await,
    )
}

pub async fn create_booking(
    ctx: &ApiContext,
    user_id: &UserId,
    input: &BookingInput,
) -> ActionResult<Booking> {
    let room = match check_availability(ctx, input, None).await {
        Ok(room) => room,
        Err(rejection) => return rejection,
    };

    match ctx.storage.insert_booking(user_id, input).await {
        Ok(BookingWrite::Saved(booking)) => {
            info!(
                booking_id = %booking.id,
                room_id = %booking.room_id,
                user_id = %user_id,
                nights = booking.nights(),
                "booking created"
            );
            ActionResult::Ok(booking)
        }
        Ok(BookingWrite::Overlapping) => already_booked(&room),
        Err(err) => internal("create booking", err),
    }
}

pub async fn update_booking(
    ctx: &ApiContext,
    id: &BookingId,
    input: &BookingInput,
) -> ActionResult<Booking> {
    let existing = match ctx.storage.load_booking(id).await {
        Ok(Some(booking)) => booking,
        Ok(None) => return ActionResult::NotFound,
        Err(err) => return internal("update booking", err),
    };
    let room = match check_availability(ctx, input, Some(&existing)).await {
        Ok(room) => room,
        Err(rejection) => return rejection,
    };

    match ctx.storage.update_booking(id, input).await {
        Ok(Some(BookingWrite::Saved(booking))) => {
            info!(booking_id = %id, status = booking.status.as_str(), "booking updated");
            ActionResult::Ok(booking)
        }
        Ok(Some(BookingWrite::Overlapping)) => already_booked(&room),
        Ok(None) => ActionResult::NotFound,
        Err(err) => internal("update booking", err),
    }
}

pub async fn delete_booking(ctx: &ApiContext, id: &BookingId) -> ActionResult<()> {
    removal("delete booking", ctx.storage.delete_booking(id).await)
}

/// Rejects stays the room cannot take: unknown or closed rooms and parties
/// above capacity. Overlaps are refused by the write itself. When `current`
/// is the booking being edited and its stay is unchanged, only the room's
/// existence is checked, so status changes go through on closed rooms.
async fn check_availability(
    ctx: &ApiContext,
    input: &BookingInput,
    current: Option<&Booking>,
) -> Result<Room, ActionResult<Booking>> {
    input.validate().map_err(ActionResult::from)?;

    let room_id = RoomId(input.room_id.trim().to_string());
    let room = match ctx.storage.load_room(&room_id).await {
        Ok(Some(room)) => room,
        Ok(None) => return Err(ActionResult::failed("selected room does not exist")),
        Err(err) => return Err(internal("check availability", err)),
    };

    let status = input.status.or(current.map(|booking| booking.status));
    if status == Some(BookingStatus::Cancelled) {
        return Ok(room);
    }
    if current.is_some_and(|booking| same_stay(booking, &room_id, input)) {
        return Ok(room);
    }
    if room.status == RoomStatus::Maintenance {
        return Err(ActionResult::failed(format!(
            "room {} is closed for maintenance",
            room.number
        )));
    }
    if input.guests_count > room.capacity {
        return Err(ActionResult::failed(format!(
            "room {} sleeps at most {} guests",
            room.number, room.capacity
        )));
    }
    Ok(room)
}

/// A live booking keeping its room, dates and party size.
fn same_stay(booking: &Booking, room_id: &RoomId, input: &BookingInput) -> bool {
    booking.status != BookingStatus::Cancelled
        && booking.room_id == *room_id
        && booking.check_in == input.check_in
        && booking.check_out == input.check_out
        && booking.guests_count == input.guests_count
}

fn already_booked(room: &Room) -> ActionResult<Booking> {
    ActionResult::failed(format!(
        "room {} is already booked for those dates",
        room.number
    ))
}
