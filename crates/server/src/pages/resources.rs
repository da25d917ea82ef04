//! Management pages that share one shape: list, create form, edit form,
//! update and delete. Each record type plugs in through [`Resource`].

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use server_api::HotelActions;
use shared::{
    domain::{Activity, ActivityId, Guest, GuestId, Room, RoomId, RoomStatus, Service, ServiceId, Staff, StaffId},
    protocol::{
        ActionResult, ActivityInput, GuestInput, RoomInput, ServiceInput, StaffInput,
        FORM_DATETIME_FORMAT,
    },
};
use tracing::{info, warn};

use super::{dashboard_page, notice_href, NoticeQuery};
use crate::{
    app_state::AppState,
    context::RequestContext,
    pipeline::{or_empty, require, PageExit},
    session::Session,
    views::{escape, money, Field, FieldKind, FormMode, FormView, ListRow, ListView},
};

pub(crate) trait Resource: Send + Sync + 'static {
    type Id: for<'a> From<&'a str> + Send + Sync + 'static;
    type Record: Send + Sync + 'static;
    type Input: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Path segment under `/dashboard`.
    const SEGMENT: &'static str;
    const ENTITY: &'static str;
    const PLURAL: &'static str;
    const COLUMNS: &'static [&'static str];

    fn fetch<'a>(
        actions: &'a dyn HotelActions,
        id: &'a Self::Id,
    ) -> BoxFuture<'a, ActionResult<Self::Record>>;
    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Self::Record>>>;
    fn create<'a>(
        actions: &'a dyn HotelActions,
        input: &'a Self::Input,
    ) -> BoxFuture<'a, ActionResult<Self::Record>>;
    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a Self::Id,
        input: &'a Self::Input,
    ) -> BoxFuture<'a, ActionResult<Self::Record>>;
    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a Self::Id) -> BoxFuture<'a, ActionResult<()>>;

    fn record_id(record: &Self::Record) -> &str;
    fn to_input(record: &Self::Record) -> Self::Input;
    /// Form fields, filled from `values` when editing or re-rendering.
    fn fields(values: Option<&Self::Input>) -> Vec<Field>;
    /// Escaped table cells in `COLUMNS` order.
    fn cells(record: &Self::Record) -> Vec<String>;
    /// Short human name, e.g. "room 42".
    fn describe(record: &Self::Record) -> String;
}

pub(crate) fn routes<R: Resource>() -> Router<Arc<AppState>> {
    let base = list_href::<R>();
    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(&format!("{base}/new"), get(new_form::<R>))
        .route(&format!("{base}/:id"), post(update::<R>))
        .route(&format!("{base}/:id/edit"), get(edit_form::<R>))
        .route(&format!("{base}/:id/delete"), post(delete::<R>))
}

fn list_href<R: Resource>() -> String {
    format!("/dashboard/{}", R::SEGMENT)
}

async fn list<R: Resource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let records = or_empty(R::PLURAL, R::fetch_all(state.actions.as_ref()).await);

    let base = list_href::<R>();
    let view = ListView {
        heading: R::PLURAL.to_string(),
        new_href: Some(format!("{base}/new")),
        columns: R::COLUMNS.to_vec(),
        rows: records
            .iter()
            .map(|record| {
                let id = R::record_id(record);
                ListRow {
                    cells: R::cells(record),
                    edit_href: Some(format!("{base}/{id}/edit")),
                    delete_href: Some(format!("{base}/{id}/delete")),
                }
            })
            .collect(),
        empty_text: format!("No {} yet.", R::PLURAL.to_lowercase()),
        notice: query.notice,
    };
    Ok(dashboard_page(&ctx, session, R::SEGMENT, R::PLURAL, &view.render()).into_response())
}

async fn new_form<R: Resource>(ctx: RequestContext) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let view = form_view::<R>(FormMode::Create, list_href::<R>(), None, String::new(), None);
    Ok(render_form::<R>(&ctx, session, &view, StatusCode::OK))
}

async fn edit_form<R: Resource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let id = R::Id::from(id.as_str());
    let record = require(R::ENTITY, R::fetch(state.actions.as_ref(), &id).await)?;

    let input = R::to_input(&record);
    let view = form_view::<R>(
        FormMode::Edit,
        format!("{}/{}", list_href::<R>(), R::record_id(&record)),
        Some(&input),
        format!("Update the details for {}.", R::describe(&record)),
        None,
    );
    Ok(render_form::<R>(&ctx, session, &view, StatusCode::OK))
}

async fn create<R: Resource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    form: Result<Form<R::Input>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let action = list_href::<R>();
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            let view = form_view::<R>(FormMode::Create, action, None, String::new(), Some(rejection.body_text()));
            return Ok(render_form::<R>(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    match R::create(state.actions.as_ref(), &input).await {
        ActionResult::Ok(record) => {
            info!(user = %session.user_id, entity = R::ENTITY, id = R::record_id(&record), "record created");
            Ok(Redirect::to(&action).into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, entity = R::ENTITY, %reason, "create rejected");
            let view = form_view::<R>(FormMode::Create, action, Some(&input), String::new(), Some(reason));
            Ok(render_form::<R>(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

async fn update<R: Resource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
    form: Result<Form<R::Input>, FormRejection>,
) -> Result<Response, PageExit> {
    let session = ctx.require_staff()?;
    let action = format!("{}/{raw_id}", list_href::<R>());
    let input = match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            let view = form_view::<R>(FormMode::Edit, action, None, String::new(), Some(rejection.body_text()));
            return Ok(render_form::<R>(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    let id = R::Id::from(raw_id.as_str());
    match R::update(state.actions.as_ref(), &id, &input).await {
        ActionResult::Ok(record) => {
            info!(user = %session.user_id, entity = R::ENTITY, id = R::record_id(&record), "record updated");
            Ok(Redirect::to(&list_href::<R>()).into_response())
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, entity = R::ENTITY, id = %raw_id, %reason, "update rejected");
            let view = form_view::<R>(FormMode::Edit, action, Some(&input), String::new(), Some(reason));
            Ok(render_form::<R>(&ctx, session, &view, StatusCode::UNPROCESSABLE_ENTITY))
        }
    }
}

async fn delete<R: Resource>(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(raw_id): Path<String>,
) -> Result<Redirect, PageExit> {
    let session = ctx.require_staff()?;
    let id = R::Id::from(raw_id.as_str());
    let base = list_href::<R>();
    match R::delete(state.actions.as_ref(), &id).await {
        ActionResult::Ok(()) => {
            info!(user = %session.user_id, entity = R::ENTITY, id = %raw_id, "record deleted");
            Ok(Redirect::to(&base))
        }
        ActionResult::NotFound => Err(PageExit::NotFound),
        ActionResult::Failed(reason) => {
            warn!(user = %session.user_id, entity = R::ENTITY, id = %raw_id, %reason, "delete rejected");
            Ok(Redirect::to(&notice_href(&base, &reason)))
        }
    }
}

fn form_view<R: Resource>(
    mode: FormMode,
    action: String,
    values: Option<&R::Input>,
    description: String,
    error: Option<String>,
) -> FormView {
    FormView {
        entity: R::ENTITY,
        mode,
        description,
        action,
        cancel_href: list_href::<R>(),
        fields: R::fields(values),
        error,
    }
}

fn render_form<R: Resource>(
    ctx: &RequestContext,
    session: &Session,
    view: &FormView,
    status: StatusCode,
) -> Response {
    let page = dashboard_page(ctx, session, R::SEGMENT, &view.heading(), &view.render());
    (status, page).into_response()
}

fn status_options() -> Vec<(String, String)> {
    RoomStatus::ALL
        .iter()
        .map(|status| (status.as_str().to_string(), capitalize(status.as_str())))
        .collect()
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}

pub(crate) struct Rooms;

impl Resource for Rooms {
    type Id = RoomId;
    type Record = Room;
    type Input = RoomInput;

    const SEGMENT: &'static str = "rooms";
    const ENTITY: &'static str = "Room";
    const PLURAL: &'static str = "Rooms";
    const COLUMNS: &'static [&'static str] = &["Number", "Type", "Price / night", "Sleeps", "Status"];

    fn fetch<'a>(actions: &'a dyn HotelActions, id: &'a RoomId) -> BoxFuture<'a, ActionResult<Room>> {
        actions.get_room_by_id(id)
    }

    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Room>>> {
        actions.get_all_rooms()
    }

    fn create<'a>(actions: &'a dyn HotelActions, input: &'a RoomInput) -> BoxFuture<'a, ActionResult<Room>> {
        actions.create_room(input)
    }

    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a RoomId,
        input: &'a RoomInput,
    ) -> BoxFuture<'a, ActionResult<Room>> {
        actions.update_room(id, input)
    }

    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a RoomId) -> BoxFuture<'a, ActionResult<()>> {
        actions.delete_room(id)
    }

    fn record_id(record: &Room) -> &str {
        record.id.as_str()
    }

    fn to_input(room: &Room) -> RoomInput {
        RoomInput {
            number: room.number.clone(),
            room_type: room.room_type.clone(),
            price_per_night: room.price_per_night,
            capacity: room.capacity,
            status: room.status,
            description: room.description.clone(),
        }
    }

    fn fields(values: Option<&RoomInput>) -> Vec<Field> {
        vec![
            Field::new("number", "Room number", FieldKind::Text).value_from(values, |v| v.number.clone()),
            Field::new("room_type", "Type", FieldKind::Text).value_from(values, |v| v.room_type.clone()),
            Field::new("price_per_night", "Price per night", FieldKind::Number { step: "0.01" })
                .value_from(values, |v| v.price_per_night.to_string()),
            Field::new("capacity", "Sleeps", FieldKind::Number { step: "1" })
                .value_from(values, |v| v.capacity.to_string()),
            Field::new("status", "Status", FieldKind::Select(status_options()))
                .value(values.map_or(RoomStatus::Available, |v| v.status).as_str()),
            Field::new("description", "Description", FieldKind::TextArea)
                .value_from(values, |v| v.description.clone())
                .optional(),
        ]
    }

    fn cells(room: &Room) -> Vec<String> {
        vec![
            escape(&room.number),
            escape(&room.room_type),
            money(room.price_per_night),
            room.capacity.to_string(),
            room.status.to_string(),
        ]
    }

    fn describe(room: &Room) -> String {
        format!("room {}", room.number)
    }
}

pub(crate) struct Guests;

impl Resource for Guests {
    type Id = GuestId;
    type Record = Guest;
    type Input = GuestInput;

    const SEGMENT: &'static str = "guests";
    const ENTITY: &'static str = "Guest";
    const PLURAL: &'static str = "Guests";
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Phone"];

    fn fetch<'a>(actions: &'a dyn HotelActions, id: &'a GuestId) -> BoxFuture<'a, ActionResult<Guest>> {
        actions.get_guest_by_id(id)
    }

    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Guest>>> {
        actions.get_all_guests()
    }

    fn create<'a>(actions: &'a dyn HotelActions, input: &'a GuestInput) -> BoxFuture<'a, ActionResult<Guest>> {
        actions.create_guest(input)
    }

    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a GuestId,
        input: &'a GuestInput,
    ) -> BoxFuture<'a, ActionResult<Guest>> {
        actions.update_guest(id, input)
    }

    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a GuestId) -> BoxFuture<'a, ActionResult<()>> {
        actions.delete_guest(id)
    }

    fn record_id(record: &Guest) -> &str {
        record.id.as_str()
    }

    fn to_input(guest: &Guest) -> GuestInput {
        GuestInput {
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            notes: guest.notes.clone(),
        }
    }

    fn fields(values: Option<&GuestInput>) -> Vec<Field> {
        vec![
            Field::new("name", "Full name", FieldKind::Text).value_from(values, |v| v.name.clone()),
            Field::new("email", "Email", FieldKind::Email).value_from(values, |v| v.email.clone()),
            Field::new("phone", "Phone", FieldKind::Text).value_from(values, |v| v.phone.clone()),
            Field::new("notes", "Notes", FieldKind::TextArea)
                .value_from(values, |v| v.notes.clone())
                .optional(),
        ]
    }

    fn cells(guest: &Guest) -> Vec<String> {
        vec![escape(&guest.name), escape(&guest.email), escape(&guest.phone)]
    }

    fn describe(guest: &Guest) -> String {
        format!("guest {}", guest.name)
    }
}

pub(crate) struct StaffMembers;

impl Resource for StaffMembers {
    type Id = StaffId;
    type Record = Staff;
    type Input = StaffInput;

    const SEGMENT: &'static str = "staff";
    const ENTITY: &'static str = "Staff Member";
    const PLURAL: &'static str = "Staff";
    const COLUMNS: &'static [&'static str] = &["Name", "Position", "Email", "Phone"];

    fn fetch<'a>(actions: &'a dyn HotelActions, id: &'a StaffId) -> BoxFuture<'a, ActionResult<Staff>> {
        actions.get_staff_by_id(id)
    }

    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Staff>>> {
        actions.get_all_staff()
    }

    fn create<'a>(actions: &'a dyn HotelActions, input: &'a StaffInput) -> BoxFuture<'a, ActionResult<Staff>> {
        actions.create_staff(input)
    }

    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a StaffId,
        input: &'a StaffInput,
    ) -> BoxFuture<'a, ActionResult<Staff>> {
        actions.update_staff(id, input)
    }

    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a StaffId) -> BoxFuture<'a, ActionResult<()>> {
        actions.delete_staff(id)
    }

    fn record_id(record: &Staff) -> &str {
        record.id.as_str()
    }

    fn to_input(staff: &Staff) -> StaffInput {
        StaffInput {
            name: staff.name.clone(),
            email: staff.email.clone(),
            position: staff.position.clone(),
            phone: staff.phone.clone(),
        }
    }

    fn fields(values: Option<&StaffInput>) -> Vec<Field> {
        vec![
            Field::new("name", "Full name", FieldKind::Text).value_from(values, |v| v.name.clone()),
            Field::new("email", "Email", FieldKind::Email).value_from(values, |v| v.email.clone()),
            Field::new("position", "Position", FieldKind::Text).value_from(values, |v| v.position.clone()),
            Field::new("phone", "Phone", FieldKind::Text).value_from(values, |v| v.phone.clone()),
        ]
    }

    fn cells(staff: &Staff) -> Vec<String> {
        vec![
            escape(&staff.name),
            escape(&staff.position),
            escape(&staff.email),
            escape(&staff.phone),
        ]
    }

    fn describe(staff: &Staff) -> String {
        staff.name.clone()
    }
}

pub(crate) struct Activities;

impl Resource for Activities {
    type Id = ActivityId;
    type Record = Activity;
    type Input = ActivityInput;

    const SEGMENT: &'static str = "activities";
    const ENTITY: &'static str = "Activity";
    const PLURAL: &'static str = "Activities";
    const COLUMNS: &'static [&'static str] = &["Title", "Starts", "Location", "Capacity"];

    fn fetch<'a>(actions: &'a dyn HotelActions, id: &'a ActivityId) -> BoxFuture<'a, ActionResult<Activity>> {
        actions.get_activity_by_id(id)
    }

    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Activity>>> {
        actions.get_all_activities()
    }

    fn create<'a>(
        actions: &'a dyn HotelActions,
        input: &'a ActivityInput,
    ) -> BoxFuture<'a, ActionResult<Activity>> {
        actions.create_activity(input)
    }

    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a ActivityId,
        input: &'a ActivityInput,
    ) -> BoxFuture<'a, ActionResult<Activity>> {
        actions.update_activity(id, input)
    }

    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a ActivityId) -> BoxFuture<'a, ActionResult<()>> {
        actions.delete_activity(id)
    }

    fn record_id(record: &Activity) -> &str {
        record.id.as_str()
    }

    fn to_input(activity: &Activity) -> ActivityInput {
        ActivityInput {
            title: activity.title.clone(),
            description: activity.description.clone(),
            location: activity.location.clone(),
            starts_at: activity.starts_at.format(FORM_DATETIME_FORMAT).to_string(),
            capacity: activity.capacity,
        }
    }

    fn fields(values: Option<&ActivityInput>) -> Vec<Field> {
        vec![
            Field::new("title", "Title", FieldKind::Text).value_from(values, |v| v.title.clone()),
            Field::new("description", "Description", FieldKind::TextArea)
                .value_from(values, |v| v.description.clone())
                .optional(),
            Field::new("location", "Location", FieldKind::Text).value_from(values, |v| v.location.clone()),
            Field::new("starts_at", "Starts at", FieldKind::DateTime)
                .value_from(values, |v| v.starts_at.clone()),
            Field::new("capacity", "Capacity", FieldKind::Number { step: "1" })
                .value_from(values, |v| v.capacity.to_string()),
        ]
    }

    fn cells(activity: &Activity) -> Vec<String> {
        vec![
            escape(&activity.title),
            activity.starts_at.format("%Y-%m-%d %H:%M").to_string(),
            escape(&activity.location),
            activity.capacity.to_string(),
        ]
    }

    fn describe(activity: &Activity) -> String {
        format!("the {} activity", activity.title)
    }
}

pub(crate) struct Services;

impl Resource for Services {
    type Id = ServiceId;
    type Record = Service;
    type Input = ServiceInput;

    const SEGMENT: &'static str = "services";
    const ENTITY: &'static str = "Service";
    const PLURAL: &'static str = "Services";
    const COLUMNS: &'static [&'static str] = &["Name", "Price", "Description"];

    fn fetch<'a>(actions: &'a dyn HotelActions, id: &'a ServiceId) -> BoxFuture<'a, ActionResult<Service>> {
        actions.get_service_by_id(id)
    }

    fn fetch_all(actions: &dyn HotelActions) -> BoxFuture<'_, ActionResult<Vec<Service>>> {
        actions.get_all_services()
    }

    fn create<'a>(
        actions: &'a dyn HotelActions,
        input: &'a ServiceInput,
    ) -> BoxFuture<'a, ActionResult<Service>> {
        actions.create_service(input)
    }

    fn update<'a>(
        actions: &'a dyn HotelActions,
        id: &'a ServiceId,
        input: &'a ServiceInput,
    ) -> BoxFuture<'a, ActionResult<Service>> {
        actions.update_service(id, input)
    }

    fn delete<'a>(actions: &'a dyn HotelActions, id: &'a ServiceId) -> BoxFuture<'a, ActionResult<()>> {
        actions.delete_service(id)
    }

    fn record_id(record: &Service) -> &str {
        record.id.as_str()
    }

    fn to_input(service: &Service) -> ServiceInput {
        ServiceInput {
            name: service.name.clone(),
            description: service.description.clone(),
            price: service.price,
        }
    }

    fn fields(values: Option<&ServiceInput>) -> Vec<Field> {
        vec![
            Field::new("name", "Name", FieldKind::Text).value_from(values, |v| v.name.clone()),
            Field::new("price", "Price", FieldKind::Number { step: "0.01" })
                .value_from(values, |v| v.price.to_string()),
            Field::new("description", "Description", FieldKind::TextArea)
                .value_from(values, |v| v.description.clone())
                .optional(),
        ]
    }

    fn cells(service: &Service) -> Vec<String> {
        vec![
            escape(&service.name),
            money(service.price),
            escape(&service.description),
        ]
    }

    fn describe(service: &Service) -> String {
        format!("the {} service", service.name)
    }
}
