//! Hotel actions: every page-facing read and write, each returning an
//! [`ActionResult`] instead of propagating backend errors.

use async_trait::async_trait;
use shared::{
    domain::{
        Activity, ActivityId, Booking, BookingId, Guest, GuestId, Message, MessageId, Room,
        RoomId, Service, ServiceId, Staff, StaffId, User, UserId,
    },
    protocol::{
        ActionResult, ActivityInput, BookingInput, GuestInput, MessageInput, RegisterInput,
        RoomInput, ServiceInput, StaffInput,
    },
};
use storage::Storage;
use tracing::error;

mod amenities;
mod auth;
mod bookings;
mod directory;
mod messages;
mod rooms;

pub use amenities::{
    create_activity, create_service, delete_activity, delete_service, get_activity_by_id,
    get_all_activities, get_all_services, get_service_by_id, update_activity, update_service,
};
pub use auth::{authenticate, register_user};
pub use bookings::{
    create_booking, delete_booking, get_all_bookings, get_booking_by_id, get_bookings_for_user,
    update_booking,
};
pub use directory::{
    create_guest, create_staff, delete_guest, delete_staff, get_all_guests, get_all_staff,
    get_guest_by_id, get_staff_by_id, update_guest, update_staff,
};
pub use messages::{create_message, delete_message, get_messages};
pub use rooms::{create_room, delete_room, get_all_rooms, get_room_by_id, update_room};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// The action surface pages depend on.
#[async_trait]
pub trait HotelActions: Send + Sync {
    /// Whether the backend can currently serve requests.
    async fn health_check(&self) -> ActionResult<()>;

    async fn authenticate(&self, email: &str, password: &str) -> ActionResult<User>;
    async fn register_user(&self, input: &RegisterInput) -> ActionResult<User>;

    async fn get_room_by_id(&self, id: &RoomId) -> ActionResult<Room>;
    async fn get_all_rooms(&self) -> ActionResult<Vec<Room>>;
    async fn create_room(&self, input: &RoomInput) -> ActionResult<Room>;
    async fn update_room(&self, id: &RoomId, input: &RoomInput) -> ActionResult<Room>;
    async fn delete_room(&self, id: &RoomId) -> ActionResult<()>;

    async fn get_booking_by_id(&self, id: &BookingId) -> ActionResult<Booking>;
    async fn get_all_bookings(&self) -> ActionResult<Vec<Booking>>;
    async fn get_bookings_for_user(&self, user_id: &UserId) -> ActionResult<Vec<Booking>>;
    async fn create_booking(&self, user_id: &UserId, input: &BookingInput)
        -> ActionResult<Booking>;
    async fn update_booking(&self, id: &BookingId, input: &BookingInput)
        -> ActionResult<Booking>;
    async fn delete_booking(&self, id: &BookingId) -> ActionResult<()>;

    async fn get_guest_by_id(&self, id: &GuestId) -> ActionResult<Guest>;
    async fn get_all_guests(&self) -> ActionResult<Vec<Guest>>;
    async fn create_guest(&self, input: &GuestInput) -> ActionResult<Guest>;
    async fn update_guest(&self, id: &GuestId, input: &GuestInput) -> ActionResult<Guest>;
    async fn delete_guest(&self, id: &GuestId) -> ActionResult<()>;

    async fn get_staff_by_id(&self, id: &StaffId) -> ActionResult<Staff>;
    async fn get_all_staff(&self) -> ActionResult<Vec<Staff>>;
    async fn create_staff(&self, input: &StaffInput) -> ActionResult<Staff>;
    async fn update_staff(&self, id: &StaffId, input: &StaffInput) -> ActionResult<Staff>;
    async fn delete_staff(&self, id: &StaffId) -> ActionResult<()>;

    async fn get_activity_by_id(&self, id: &ActivityId) -> ActionResult<Activity>;
    async fn get_all_activities(&self) -> ActionResult<Vec<Activity>>;
    async fn create_activity(&self, input: &ActivityInput) -> ActionResult<Activity>;
    async fn update_activity(&self, id: &ActivityId, input: &ActivityInput)
        -> ActionResult<Activity>;
    async fn delete_activity(&self, id: &ActivityId) -> ActionResult<()>;

    async fn get_service_by_id(&self, id: &ServiceId) -> ActionResult<Service>;
    async fn get_all_services(&self) -> ActionResult<Vec<Service>>;
    async fn create_service(&self, input: &ServiceInput) -> ActionResult<Service>;
    async fn update_service(&self, id: &ServiceId, input: &ServiceInput) -> ActionResult<Service>;
    async fn delete_service(&self, id: &ServiceId) -> ActionResult<()>;

    /// All messages, or only those written by `author`.
    async fn get_messages(&self, author: Option<&UserId>) -> ActionResult<Vec<Message>>;
    async fn create_message(&self, user_id: &UserId, input: &MessageInput)
        -> ActionResult<Message>;
    async fn delete_message(&self, id: &MessageId) -> ActionResult<()>;
}

#[async_trait]
impl HotelActions for ApiContext {
    async fn health_check(&self) -> ActionResult<()> {
        match self.storage.health_check().await {
            Ok(()) => ActionResult::Ok(()),
            Err(err) => internal("health check", err),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> ActionResult<User> {
        authenticate(self, email, password).await
    }

    async fn register_user(&self, input: &RegisterInput) -> ActionResult<User> {
        register_user(self, input).await
    }

    async fn get_room_by_id(&self, id: &RoomId) -> ActionResult<Room> {
        get_room_by_id(self, id).await
    }

    async fn get_all_rooms(&self) -> ActionResult<Vec<Room>> {
        get_all_rooms(self).await
    }

    async fn create_room(&self, input: &RoomInput) -> ActionResult<Room> {
        create_room(self, input).await
    }

    async fn update_room(&self, id: &RoomId, input: &RoomInput) -> ActionResult<Room> {
        update_room(self, id, input).await
    }

    async fn delete_room(&self, id: &RoomId) -> ActionResult<()> {
        delete_room(self, id).await
    }

    async fn get_booking_by_id(&self, id: &BookingId) -> ActionResult<Booking> {
        get_booking_by_id(self, id).await
    }

    async fn get_all_bookings(&self) -> ActionResult<Vec<Booking>> {
        get_all_bookings(self).await
    }

    async fn get_bookings_for_user(&self, user_id: &UserId) -> ActionResult<Vec<Booking>> {
        get_bookings_for_user(self, user_id).await
    }

    async fn create_booking(
        &self,
        user_id: &UserId,
        input: &BookingInput,
    ) -> ActionResult<Booking> {
        create_booking(self, user_id, input).await
    }

    async fn update_booking(
        &self,
        id: &BookingId,
        input: &BookingInput,
    ) -> ActionResult<Booking> {
        update_booking(self, id, input).await
    }

    async fn delete_booking(&self, id: &BookingId) -> ActionResult<()> {
        delete_booking(self, id).await
    }

    async fn get_guest_by_id(&self, id: &GuestId) -> ActionResult<Guest> {
        get_guest_by_id(self, id).await
    }

    async fn get_all_guests(&self) -> ActionResult<Vec<Guest>> {
        get_all_guests(self).await
    }

    async fn create_guest(&self, input: &GuestInput) -> ActionResult<Guest> {
        create_guest(self, input).await
    }

    async fn update_guest(&self, id: &GuestId, input: &GuestInput) -> ActionResult<Guest> {
        update_guest(self, id, input).await
    }

    async fn delete_guest(&self, id: &GuestId) -> ActionResult<()> {
        delete_guest(self, id).await
    }

    async fn get_staff_by_id(&self, id: &StaffId) -> ActionResult<Staff> {
        get_staff_by_id(self, id).await
    }

    async fn get_all_staff(&self) -> ActionResult<Vec<Staff>> {
        get_all_staff(self).await
    }

    async fn create_staff(&self, input: &StaffInput) -> ActionResult<Staff> {
        create_staff(self, input).await
    }

    async fn update_staff(&self, id: &StaffId, input: &StaffInput) -> ActionResult<Staff> {
        update_staff(self, id, input).await
    }

    async fn delete_staff(&self, id: &StaffId) -> ActionResult<()> {
        delete_staff(self, id).await
    }

    async fn get_activity_by_id(&self, id: &ActivityId) -> ActionResult<Activity> {
        get_activity_by_id(self, id).await
    }

    async fn get_all_activities(&self) -> ActionResult<Vec<Activity>> {
        get_all_activities(self).await
    }

    async fn create_activity(&self, input: &ActivityInput) -> ActionResult<Activity> {
        create_activity(self, input).await
    }

    async fn update_activity(
        &self,
        id: &ActivityId,
        input: &ActivityInput,
    ) -> ActionResult<Activity> {
        update_activity(self, id, input).await
    }

    async fn delete_activity(&self, id: &ActivityId) -> ActionResult<()> {
        delete_activity(self, id).await
    }

    async fn get_service_by_id(&self, id: &ServiceId) -> ActionResult<Service> {
        get_service_by_id(self, id).await
    }

    async fn get_all_services(&self) -> ActionResult<Vec<Service>> {
        get_all_services(self).await
    }

    async fn create_service(&self, input: &ServiceInput) -> ActionResult<Service> {
        create_service(self, input).await
    }

    async fn update_service(&self, id: &ServiceId, input: &ServiceInput) -> ActionResult<Service> {
        update_service(self, id, input).await
    }

    async fn delete_service(&self, id: &ServiceId) -> ActionResult<()> {
        delete_service(self, id).await
    }

    async fn get_messages(&self, author: Option<&UserId>) -> ActionResult<Vec<Message>> {
        get_messages(self, author).await
    }

    async fn create_message(
        &self,
        user_id: &UserId,
        input: &MessageInput,
    ) -> ActionResult<Message> {
        create_message(self, user_id, input).await
    }

    async fn delete_message(&self, id: &MessageId) -> ActionResult<()> {
        delete_message(self, id).await
    }
}

fn lookup<T>(action: &'static str, result: anyhow::Result<Option<T>>) -> ActionResult<T> {
    match result {
        Ok(value) => ActionResult::from_lookup(value),
        Err(err) => internal(action, err),
    }
}

fn listing<T>(action: &'static str, result: anyhow::Result<Vec<T>>) -> ActionResult<Vec<T>> {
    match result {
        Ok(values) => ActionResult::Ok(values),
        Err(err) => internal(action, err),
    }
}

fn removal(action: &'static str, result: anyhow::Result<bool>) -> ActionResult<()> {
    match result {
        Ok(true) => ActionResult::Ok(()),
        Ok(false) => ActionResult::NotFound,
        Err(err) => internal(action, err),
    }
}

fn internal<T>(action: &'static str, err: anyhow::Error) -> ActionResult<T> {
    error!(action, error = %format!("{err:#}"), "backend call failed");
    ActionResult::Failed(format!("{action} failed"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
