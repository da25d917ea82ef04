use shared::{
    domain::{Guest, GuestId, Staff, StaffId},
    protocol::{ActionResult, GuestInput, StaffInput},
};
use tracing::info;

use crate::{internal, listing, lookup, removal, ApiContext};

pub async fn get_guest_by_id(ctx: &ApiContext, id: &GuestId) -> ActionResult<Guest> {
    lookup("load guest", ctx.storage.load_guest(id).await)
}

pub async fn get_all_guests(ctx: &ApiContext) -> ActionResult<Vec<Guest>> {
    listing("list guests", ctx.storage.list_guests().await)
}

pub async fn create_guest(ctx: &ApiContext, input: &GuestInput) -> ActionResult<Guest> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.insert_guest(input).await {
        Ok(guest) => {
            info!(guest_id = %guest.id, "guest created");
            ActionResult::Ok(guest)
        }
        Err(err) => internal("create guest", err),
    }
}

pub async fn update_guest(ctx: &ApiContext, id: &GuestId, input: &GuestInput) -> ActionResult<Guest> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    lookup("update guest", ctx.storage.update_guest(id, input).await)
}

pub async fn delete_guest(ctx: &ApiContext, id: &GuestId) -> ActionResult<()> {
    removal("delete guest", ctx.storage.delete_guest(id).await)
}

pub async fn get_staff_by_id(ctx: &ApiContext, id: &StaffId) -> ActionResult<Staff> {
    lookup("load staff member", ctx.storage.load_staff(id).await)
}

pub async fn get_all_staff(ctx: &ApiContext) -> ActionResult<Vec<Staff>> {
    listing("list staff", ctx.storage.list_staff().await)
}

pub async fn create_staff(ctx: &ApiContext, input: &StaffInput) -> ActionResult<Staff> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    match ctx.storage.insert_staff(input).await {
        Ok(staff) => {
            info!(staff_id = %staff.id, position = %staff.position, "staff member created");
            ActionResult::Ok(staff)
        }
        Err(err) => internal("create staff member", err),
    }
}

pub async fn update_staff(ctx: &ApiContext, id: &StaffId, input: &StaffInput) -> ActionResult<Staff> {
    if let Err(err) = input.validate() {
        return err.into();
    }
    lookup("update staff member", ctx.storage.update_staff(id, input).await)
}

pub async fn delete_staff(ctx: &ApiContext, id: &StaffId) -> ActionResult<()> {
    removal("delete staff member", ctx.storage.delete_staff(id).await)
}
