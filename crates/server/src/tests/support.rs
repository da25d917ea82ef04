//! A `HotelActions` fake that answers from scripted JSON envelopes and
//! records the name of every call it receives, plus the author filter of
//! each message listing.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use server_api::HotelActions;
use shared::{
    domain::{
        Activity, ActivityId, Booking, BookingId, Guest, GuestId, Message, MessageId, Room,
        RoomId, Service, ServiceId, Staff, StaffId, User, UserId,
    },
    protocol::{
        ActionResult, ActivityInput, BookingInput, Envelope, GuestInput, MessageInput,
        RegisterInput, RoomInput, ServiceInput, StaffInput,
    },
};

#[derive(Default)]
pub(crate) struct ScriptedActions {
    replies: HashMap<&'static str, Value>,
    calls: Mutex<Vec<&'static str>>,
    message_authors: Mutex<Vec<Option<UserId>>>,
}

impl ScriptedActions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, action: &'static str, envelope: Value) -> Self {
        self.replies.insert(action, envelope);
        self
    }

    pub(crate) fn ok(self, action: &'static str, data: impl Serialize) -> Self {
        self.reply(action, json!({ "success": true, "data": data }))
    }

    pub(crate) fn fail(self, action: &'static str, message: &str) -> Self {
        self.reply(action, json!({ "success": false, "message": message }))
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn message_authors(&self) -> Vec<Option<UserId>> {
        self.message_authors.lock().expect("authors lock").clone()
    }

    fn answer<T: DeserializeOwned>(&self, action: &'static str) -> ActionResult<T> {
        self.calls.lock().expect("calls lock").push(action);
        let Some(reply) = self.replies.get(action) else {
            return ActionResult::failed(format!("{action} was not scripted"));
        };
        match serde_json::from_value::<Envelope<T>>(reply.clone()) {
            Ok(envelope) => envelope.into(),
            Err(err) => ActionResult::failed(format!("bad script for {action}: {err}")),
        }
    }

    fn answer_unit(&self, action: &'static str) -> ActionResult<()> {
        self.answer::<Value>(action).map(|_| ())
    }
}

#[async_trait]
impl HotelActions for ScriptedActions {
    async fn health_check(&self) -> ActionResult<()> {
        self.answer_unit("health_check")
    }

    async fn authenticate(&self, _email: &str, _password: &str) -> ActionResult<User> {
        self.answer("authenticate")
    }

    async fn register_user(&self, _input: &RegisterInput) -> ActionResult<User> {
        self.answer("register_user")
    }

    async fn get_room_by_id(&self, _id: &RoomId) -> ActionResult<Room> {
        self.answer("get_room_by_id")
    }

    async fn get_all_rooms(&self) -> ActionResult<Vec<Room>> {
        self.answer("get_all_rooms")
    }

    async fn create_room(&self, _input: &RoomInput) -> ActionResult<Room> {
        self.answer("create_room")
    }

    async fn update_room(&self, _id: &RoomId, _input: &RoomInput) -> ActionResult<Room> {
        self.answer("update_room")
    }

    async fn delete_room(&self, _id: &RoomId) -> ActionResult<()> {
        self.answer_unit("delete_room")
    }

    async fn get_booking_by_id(&self, _id: &BookingId) -> ActionResult<Booking> {
        self.answer("get_booking_by_id")
    }

    async fn get_all_bookings(&self) -> ActionResult<Vec<Booking>> {
        self.answer("get_all_bookings")
    }

    async fn get_bookings_for_user(&self, _user_id: &UserId) -> ActionResult<Vec<Booking>> {
        self.answer("get_bookings_for_user")
    }

    async fn create_booking(
        &self,
        _user_id: &UserId,
        _input: &BookingInput,
    ) -> ActionResult<Booking> {
        self.answer("create_booking")
    }

    async fn update_booking(
        &self,
        _id: &BookingId,
        _input: &BookingInput,
    ) -> ActionResult<Booking> {
        self.answer("update_booking")
    }

    async fn delete_booking(&self, _id: &BookingId) -> ActionResult<()> {
        self.answer_unit("delete_booking")
    }

    async fn get_guest_by_id(&self, _id: &GuestId) -> ActionResult<Guest> {
        self.answer("get_guest_by_id")
    }

    async fn get_all_guests(&self) -> ActionResult<Vec<Guest>> {
        self.answer("get_all_guests")
    }

    async fn create_guest(&self, _input: &GuestInput) -> ActionResult<Guest> {
        self.answer("create_guest")
    }

    async fn update_guest(&self, _id: &GuestId, _input: &GuestInput) -> ActionResult<Guest> {
        self.answer("update_guest")
    }

    async fn delete_guest(&self, _id: &GuestId) -> ActionResult<()> {
        self.answer_unit("delete_guest")
    }

    async fn get_staff_by_id(&self, _id: &StaffId) -> ActionResult<Staff> {
        self.answer("get_staff_by_id")
    }

    async fn get_all_staff(&self) -> ActionResult<Vec<Staff>> {
        self.answer("get_all_staff")
    }

    async fn create_staff(&self, _input: &StaffInput) -> ActionResult<Staff> {
        self.answer("create_staff")
    }

    async fn update_staff(&self, _id: &StaffId, _input: &StaffInput) -> ActionResult<Staff> {
        self.answer("update_staff")
    }

    async fn delete_staff(&self, _id: &StaffId) -> ActionResult<()> {
        self.answer_unit("delete_staff")
    }

    async fn get_activity_by_id(&self, _id: &ActivityId) -> ActionResult<Activity> {
        self.answer("get_activity_by_id")
    }

    async fn get_all_activities(&self) -> ActionResult<Vec<Activity>> {
        self.answer("get_all_activities")
    }

    async fn create_activity(&self, _input: &ActivityInput) -> ActionResult<Activity> {
        self.answer("create_activity")
    }

    async fn update_activity(
        &self,
        _id: &ActivityId,
        _input: &ActivityInput,
    ) -> ActionResult<Activity> {
        self.answer("update_activity")
    }

    async fn delete_activity(&self, _id: &ActivityId) -> ActionResult<()> {
        self.answer_unit("delete_activity")
    }

    async fn get_service_by_id(&self, _id: &ServiceId) -> ActionResult<Service> {
        self.answer("get_service_by_id")
    }

    async fn get_all_services(&self) -> ActionResult<Vec<Service>> {
        self.answer("get_all_services")
    }

    async fn create_service(&self, _input: &ServiceInput) -> ActionResult<Service> {
        self.answer("create_service")
    }

    async fn update_service(&self, _id: &ServiceId, _input: &ServiceInput) -> ActionResult<Service> {
        self.answer("update_service")
    }

    async fn delete_service(&self, _id: &ServiceId) -> ActionResult<()> {
        self.answer_unit("delete_service")
    }

    async fn get_messages(&self, author: Option<&UserId>) -> ActionResult<Vec<Message>> {
        self.message_authors
            .lock()
            .expect("authors lock")
            .push(author.cloned());
        self.answer("get_messages")
    }

    async fn create_message(
        &self,
        _user_id: &UserId,
        _input: &MessageInput,
    ) -> ActionResult<Message> {
        self.answer("create_message")
    }

    async fn delete_message(&self, _id: &MessageId) -> ActionResult<()> {
        self.answer_unit("delete_message")
    }
}
