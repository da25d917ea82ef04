use shared::{
    domain::{Room, RoomId},
    protocol::{ActionResult, RoomInput},
};
use tracing::info;

use crate::{internal, listing, lookup, removal, ApiContext};

pub async fn get_room_by_id(ctx: &ApiContext, id: &RoomId) -> ActionResult<Room> {
    lookup("load room", ctx.storage.load_room(id).await)
}

pub async fn get_all_rooms(ctx: &ApiContext) -> ActionResult<Vec<Room>> {
    listing("list rooms", ctx.storage.list_rooms().await)
}

pub async fn create_room(ctx: &ApiContext, input: &RoomInput) -> ActionResult<Room> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.room_number_taken(&input.number, None).await {
        Ok(true) => {
            return ActionResult::failed(format!("room {} already exists", input.number.trim()))
        }
        Ok(false) => {}
        Err(err) => return internal("create room", err),
    }

    match ctx.storage.insert_room(input).await {
        Ok(room) => {
            info!(room_id = %room.id, number = %room.number, "room created");
            ActionResult::Ok(room)
        }
        Err(err) => internal("create room", err),
    }
}

pub async fn update_room(ctx: &ApiContext, id: &RoomId, input: &RoomInput) -> ActionResult<Room> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.room_number_taken(&input.number, Some(id)).await {
        Ok(true) => {
            return ActionResult::failed(format!("room {} already exists", input.number.trim()))
        }
        Ok(false) => {}
        Err(err) => return internal("update room", err),
    }

    let result = lookup("update room", ctx.storage.update_room(id, input).await);
    if result.is_ok() {
        info!(room_id = %id, "room updated");
    }
    result
}

/// Rooms with booking history are kept so past stays stay resolvable.
pub async fn delete_room(ctx: &ApiContext, id: &RoomId) -> ActionResult<()> {
    match ctx.storage.count_bookings_for_room(id).await {
        Ok(0) => {}
        Ok(_) => return ActionResult::failed("room has bookings and cannot be deleted"),
        Err(err) => return internal("delete room", err),
    }
    removal("delete room", ctx.storage.delete_room(id).await)
}
