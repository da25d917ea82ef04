use super::*;
use crate::{config::Settings, session::SESSION_COOKIE, test_support::ScriptedActions};
use axum::{
    body::{self, Body},
    http::{header, Request},
    response::Response,
};
use chrono::{NaiveDate, Utc};
use server_api::HotelActions;
use shared::domain::{
    Booking, BookingId, BookingStatus, Message, MessageId, Role, Room, RoomId, RoomStatus, User,
    UserId,
};
use tower::ServiceExt;

fn app_with(actions: Arc<dyn HotelActions>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(actions, &Settings::default()));
    (build_router(state.clone()), state)
}

fn scripted(actions: ScriptedActions) -> (Router, Arc<AppState>, Arc<ScriptedActions>) {
    let actions = Arc::new(actions);
    let (app, state) = app_with(actions.clone());
    (app, state, actions)
}

fn user(role: Role) -> User {
    User {
        id: UserId::from("user-1"),
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
        role,
    }
}

fn cookie(state: &AppState, role: Role) -> String {
    let token = state.sessions.issue(&user(role)).expect("token");
    format!("{SESSION_COOKIE}={token}")
}

fn room_42() -> Room {
    Room {
        id: RoomId::from("room-42"),
        number: "42".to_string(),
        room_type: "Double".to_string(),
        price_per_night: 140.0,
        capacity: 2,
        status: RoomStatus::Available,
        description: "Harbor view".to_string(),
    }
}

fn booking(owner: &str) -> Booking {
    Booking {
        id: BookingId::from("booking-1"),
        user_id: UserId::from(owner),
        room_id: RoomId::from("room-42"),
        guest_name: "Ada Lovelace".to_string(),
        check_in: NaiveDate::from_ymd_opt(2026, 12, 1).expect("date"),
        check_out: NaiveDate::from_ymd_opt(2026, 12, 4).expect("date"),
        guests_count: 2,
        status: BookingStatus::Confirmed,
        created_at: Utc::now(),
    }
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut request = Request::get(path);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::empty()).expect("request")
}

fn post_form(path: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
    let mut request = Request::post(path).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::from(form.to_string())).expect("request")
}

async fn text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().expect("location")
}

const ROOM_FORM: &str =
    "number=42&room_type=Double&price_per_night=140&capacity=2&status=available&description=";

#[tokio::test]
async fn healthz_reports_ok_when_backend_is_ready() {
    let (app, _, _) = scripted(ScriptedActions::new().ok("health_check", true));
    let response = app.oneshot(get("/healthz", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(text(response).await, "ok");
}

#[tokio::test]
async fn healthz_reports_unavailable_backend() {
    let (app, _, _) = scripted(ScriptedActions::new().fail("health_check", "database locked"));
    let response = app.oneshot(get("/healthz", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn protected_pages_redirect_to_login_without_loading_anything() {
    let (app, _, actions) = scripted(ScriptedActions::new());
    for path in [
        "/dashboard",
        "/dashboard/rooms",
        "/dashboard/rooms/room-42/edit",
        "/dashboard/bookings/booking-1/edit",
        "/dashboard/messages",
        "/book/room-42",
    ] {
        let response = app.clone().oneshot(get(path, None)).await.expect("response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert!(
            location(&response).starts_with("/login?callbackUrl=%2F"),
            "{path} -> {}",
            location(&response)
        );
    }

    let response = app
        .oneshot(post_form("/dashboard/rooms", None, ROOM_FORM))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(actions.calls().is_empty(), "{:?}", actions.calls());
}

#[tokio::test]
async fn login_redirect_carries_the_requested_path() {
    let (app, _, _) = scripted(ScriptedActions::new());
    let response = app
        .oneshot(get("/dashboard/rooms/room-42/edit", None))
        .await
        .expect("response");
    assert_eq!(
        location(&response),
        "/login?callbackUrl=%2Fdashboard%2Frooms%2Froom-42%2Fedit"
    );
}

#[tokio::test]
async fn guests_are_sent_back_from_staff_sections() {
    let (app, state, actions) = scripted(ScriptedActions::new());
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(get("/dashboard/rooms", Some(&guest)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn edit_page_is_not_found_whatever_the_failure() {
    for actions in [
        ScriptedActions::new().fail("get_room_by_id", "database unavailable"),
        ScriptedActions::new().reply("get_room_by_id", serde_json::json!({ "success": true })),
        ScriptedActions::new().fail("get_room_by_id", "not found"),
    ] {
        let (app, state, _) = scripted(actions);
        let staff = cookie(&state, Role::Staff);
        let response = app
            .oneshot(get("/dashboard/rooms/room-42/edit", Some(&staff)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn list_page_degrades_to_empty_when_loading_fails() {
    let (app, state, _) = scripted(ScriptedActions::new().fail("get_all_rooms", "timeout"));
    let staff = cookie(&state, Role::Admin);
    let response = app
        .oneshot(get("/dashboard/rooms", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("No rooms yet."));
    assert!(!html.contains("<table>"));
}

#[tokio::test]
async fn messages_degrade_to_empty_when_loading_fails() {
    let (app, state, actions) = scripted(ScriptedActions::new().fail("get_messages", "database locked"));
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(get("/dashboard/messages", Some(&guest)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("No messages yet."));
    assert!(!html.contains("database locked"));
    assert_eq!(actions.calls(), vec!["get_messages"]);
}

#[tokio::test]
async fn guests_only_list_their_own_messages() {
    let note = Message {
        id: MessageId::from("message-1"),
        user_id: UserId::from("user-1"),
        subject: "Late arrival".to_string(),
        body: "Arriving after midnight".to_string(),
        created_at: Utc::now(),
    };
    let (app, state, actions) = scripted(ScriptedActions::new().ok("get_messages", vec![note]));
    let guest = cookie(&state, Role::Guest);
    let response = app
        .clone()
        .oneshot(get("/dashboard/messages", Some(&guest)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("Late arrival"));
    assert!(!html.contains("/dashboard/messages/message-1/delete"));

    let staff = cookie(&state, Role::Admin);
    let response = app
        .oneshot(get("/dashboard/messages", Some(&staff)))
        .await
        .expect("response");
    assert!(text(response).await.contains("/dashboard/messages/message-1/delete"));

    assert_eq!(
        actions.message_authors(),
        vec![Some(UserId::from("user-1")), None]
    );
}

#[tokio::test]
async fn editing_room_42_prefills_the_form() {
    let (app, state, actions) = scripted(ScriptedActions::new().ok("get_room_by_id", room_42()));
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/rooms/room-42/edit", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("<h1>Edit Room</h1>"));
    assert!(html.contains("Update the details for room 42."));
    assert!(html.contains("data-mode=\"edit\""));
    assert!(html.contains("name=\"number\" value=\"42\""));
    assert!(html.contains("action=\"/dashboard/rooms/room-42\""));
    assert_eq!(actions.calls(), vec!["get_room_by_id"]);
}

#[tokio::test]
async fn new_room_form_starts_empty_and_loads_nothing() {
    let (app, state, actions) = scripted(ScriptedActions::new());
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/rooms/new", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("<h1>New Room</h1>"));
    assert!(html.contains("data-mode=\"create\""));
    assert!(html.contains("name=\"number\" value=\"\""));
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn booking_edit_is_not_found_when_the_booking_fails() {
    let (app, state, actions) = scripted(
        ScriptedActions::new()
            .fail("get_booking_by_id", "database unavailable")
            .ok("get_all_rooms", vec![room_42()]),
    );
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/bookings/booking-1/edit", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut calls = actions.calls();
    calls.sort_unstable();
    assert_eq!(calls, vec!["get_all_rooms", "get_booking_by_id"]);
}

#[tokio::test]
async fn booking_edit_is_not_found_when_the_rooms_fail() {
    let (app, state, _) = scripted(
        ScriptedActions::new()
            .ok("get_booking_by_id", booking("user-1"))
            .fail("get_all_rooms", "timeout"),
    );
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/bookings/booking-1/edit", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_edit_renders_when_both_loads_succeed() {
    let (app, state, _) = scripted(
        ScriptedActions::new()
            .ok("get_booking_by_id", booking("user-1"))
            .ok("get_all_rooms", vec![room_42()]),
    );
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/bookings/booking-1/edit", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains("<h1>Edit Booking</h1>"));
    assert!(html.contains("<option value=\"room-42\" selected>"));
    assert!(html.contains("name=\"check_in\" value=\"2026-12-01\""));
    assert!(html.contains("<option value=\"confirmed\" selected>"));
}

#[tokio::test]
async fn new_booking_form_carries_the_session_user() {
    let (app, state, _) = scripted(ScriptedActions::new().fail("get_all_rooms", "timeout"));
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/dashboard/bookings/new", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("<input type=\"hidden\" name=\"user_id\" value=\"user-1\">"));
}

#[tokio::test]
async fn rejected_create_rerenders_the_form_with_the_reason() {
    let (app, state, _) = scripted(
        ScriptedActions::new().fail("create_room", "room 42 already exists"),
    );
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(post_form("/dashboard/rooms", Some(&staff), ROOM_FORM))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let html = text(response).await;
    assert!(html.contains("room 42 already exists"));
    assert!(html.contains("name=\"room_type\" value=\"Double\""));
}

#[tokio::test]
async fn accepted_create_redirects_to_the_list() {
    let (app, state, actions) = scripted(ScriptedActions::new().ok("create_room", room_42()));
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(post_form("/dashboard/rooms", Some(&staff), ROOM_FORM))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/rooms");
    assert_eq!(actions.calls(), vec!["create_room"]);
}

#[tokio::test]
async fn refused_delete_returns_to_the_list_with_a_notice() {
    let (app, state, _) = scripted(
        ScriptedActions::new().fail("delete_room", "room has bookings and cannot be deleted"),
    );
    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(post_form("/dashboard/rooms/room-42/delete", Some(&staff), ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/dashboard/rooms?notice=room+has+bookings"));
}

#[tokio::test]
async fn public_chrome_disappears_once_signed_in() {
    let (app, state, _) = scripted(ScriptedActions::new().ok("get_all_rooms", vec![room_42()]));

    let anonymous = app.clone().oneshot(get("/rooms", None)).await.expect("response");
    let html = text(anonymous).await;
    assert!(html.contains("site-header"));
    assert!(html.contains("Room 42"));

    let guest = cookie(&state, Role::Guest);
    let signed_in = app.oneshot(get("/rooms", Some(&guest))).await.expect("response");
    let html = text(signed_in).await;
    assert!(!html.contains("site-header"));
    assert!(!html.contains("site-footer"));
}

#[tokio::test]
async fn dashboard_never_shows_public_chrome() {
    let (app, state, _) = scripted(ScriptedActions::new());
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(get("/dashboard", Some(&guest)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(!html.contains("site-header"));
    assert!(html.contains("Welcome back, Ada"));
    assert!(html.contains("No bookings yet."));
}

#[tokio::test]
async fn room_detail_is_not_found_when_missing() {
    let (app, _, _) = scripted(ScriptedActions::new().fail("get_room_by_id", "not found"));
    let response = app
        .oneshot(get("/rooms/room-404", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn guest_booking_is_created_for_the_session_user() {
    let (app, state, actions) = scripted(ScriptedActions::new().ok("create_booking", booking("user-1")));
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(post_form(
            "/book/room-42",
            Some(&guest),
            "user_id=someone-else&room_id=room-42&guest_name=Ada&check_in=2026-12-01&check_out=2026-12-04&guests_count=2",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert_eq!(actions.calls(), vec!["create_booking"]);
}

#[tokio::test]
async fn rejected_guest_booking_shows_the_reason() {
    let (app, state, _) = scripted(
        ScriptedActions::new()
            .fail("create_booking", "room 42 is already booked for those dates")
            .ok("get_room_by_id", room_42()),
    );
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(post_form(
            "/book/room-42",
            Some(&guest),
            "room_id=room-42&guest_name=Ada&check_in=2026-12-01&check_out=2026-12-04&guests_count=2",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(text(response).await.contains("already booked for those dates"));
}

#[tokio::test]
async fn login_sets_the_cookie_and_follows_local_callbacks() {
    let (app, state, _) = scripted(ScriptedActions::new().ok("authenticate", user(Role::Staff)));
    let response = app
        .oneshot(post_form(
            "/login",
            None,
            "email=ada%40example.com&password=pw&callbackUrl=%2Fdashboard%2Frooms",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/rooms");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().expect("cookie");
    let token = set_cookie
        .strip_prefix("hotel_session=")
        .and_then(|rest| rest.split(';').next())
        .expect("session cookie");
    let session = state.sessions.verify(token).expect("valid token");
    assert_eq!(session.role, Role::Staff);
}

#[tokio::test]
async fn login_ignores_foreign_callbacks() {
    let (app, _, _) = scripted(ScriptedActions::new().ok("authenticate", user(Role::Guest)));
    let response = app
        .oneshot(post_form(
            "/login",
            None,
            "email=ada%40example.com&password=pw&callbackUrl=%2F%2Fevil.example",
        ))
        .await
        .expect("response");
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn login_refuses_callbacks_with_control_characters() {
    for callback in ["%2Fa%0Ab", "%2F%09%2Fevil.example", "%2Frooms%0D%0ASet-Cookie%3A%20x%3D1"] {
        let (app, _, _) = scripted(ScriptedActions::new().ok("authenticate", user(Role::Guest)));
        let response = app
            .oneshot(post_form(
                "/login",
                None,
                &format!("email=ada%40example.com&password=pw&callbackUrl={callback}"),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{callback}");
        assert_eq!(location(&response), "/dashboard", "{callback}");
    }
}

#[tokio::test]
async fn failed_login_rerenders_with_401() {
    let (app, _, _) = scripted(ScriptedActions::new().fail("authenticate", "invalid email or password"));
    let response = app
        .oneshot(post_form("/login", None, "email=ada%40example.com&password=nope"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = text(response).await;
    assert!(html.contains("invalid email or password"));
    assert!(html.contains("value=\"ada@example.com\""));
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let (app, state, _) = scripted(ScriptedActions::new());
    let guest = cookie(&state, Role::Guest);
    let response = app
        .oneshot(post_form("/logout", Some(&guest), ""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().expect("cookie");
    assert!(set_cookie.starts_with("hotel_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn api_rooms_answer_with_envelopes() {
    let (app, _, _) = scripted(ScriptedActions::new().ok("get_all_rooms", vec![room_42()]));
    let response = app.oneshot(get("/api/rooms", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&text(response).await).expect("json");
    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0]["number"], "42");

    let (app, _, _) = scripted(ScriptedActions::new().fail("get_room_by_id", "database unavailable"));
    let response = app
        .oneshot(get("/api/rooms/room-42", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&text(response).await).expect("json");
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "database unavailable");
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn api_booking_requires_a_session_and_ownership() {
    let (app, state, actions) = scripted(ScriptedActions::new().ok("get_booking_by_id", booking("someone-else")));

    let response = app
        .clone()
        .oneshot(get("/api/bookings/booking-1", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(actions.calls().is_empty());

    let guest = cookie(&state, Role::Guest);
    let response = app
        .clone()
        .oneshot(get("/api/bookings/booking-1", Some(&guest)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let staff = cookie(&state, Role::Staff);
    let response = app
        .oneshot(get("/api/bookings/booking-1", Some(&staff)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_bodies_are_refused() {
    let (app, state, actions) = scripted(ScriptedActions::new());
    let staff = cookie(&state, Role::Staff);
    let form = format!("{ROOM_FORM}{}", "x".repeat(Settings::default().max_body_bytes));
    let request = Request::post("/dashboard/rooms")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::CONTENT_LENGTH, form.len())
        .header(header::COOKIE, staff)
        .body(Body::from(form))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn register_then_reach_the_dashboard_with_real_storage() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let (app, _) = app_with(Arc::new(ApiContext { storage }));

    let response = app
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "name=Ada+Lovelace&email=ada%40example.com&password=analytical",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let session_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("cookie")
        .split(';')
        .next()
        .expect("pair")
        .to_string();

    let response = app
        .clone()
        .oneshot(get("/dashboard", Some(&session_cookie)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Welcome back, Ada Lovelace"));

    let response = app
        .oneshot(get("/dashboard/rooms", Some(&session_cookie)))
        .await
        .expect("response");
    assert_eq!(location(&response), "/dashboard");
}
