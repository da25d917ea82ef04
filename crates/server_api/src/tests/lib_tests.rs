use super::*;
use chrono::NaiveDate;
use shared::domain::{BookingStatus, Role, RoomStatus};

async fn setup() -> (ApiContext, User, Room) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let user = storage
        .create_user("guest@example.com", "Guest", Role::Guest, "password123")
        .await
        .expect("user");
    let room = storage
        .insert_room(&room_input("42", 2))
        .await
        .expect("room");
    (ApiContext { storage }, user, room)
}

fn room_input(number: &str, capacity: i64) -> RoomInput {
    RoomInput {
        number: number.to_string(),
        room_type: "Double".to_string(),
        price_per_night: 140.0,
        capacity,
        status: RoomStatus::Available,
        description: String::new(),
    }
}

fn stay(room: &Room, from: u32, to: u32, guests: i64) -> BookingInput {
    BookingInput {
        room_id: room.id.0.clone(),
        guest_name: "Ada Lovelace".to_string(),
        check_in: NaiveDate::from_ymd_opt(2026, 12, from).expect("date"),
        check_out: NaiveDate::from_ymd_opt(2026, 12, to).expect("date"),
        guests_count: guests,
        status: None,
    }
}

fn failure<T: std::fmt::Debug>(result: ActionResult<T>) -> String {
    match result {
        ActionResult::Failed(reason) => reason,
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_room_is_not_found() {
    let (ctx, _, _) = setup().await;
    let result = get_room_by_id(&ctx, &RoomId::from("room-404")).await;
    assert_eq!(result, ActionResult::NotFound);
}

#[tokio::test]
async fn duplicate_room_number_is_rejected() {
    let (ctx, _, _) = setup().await;
    let reason = failure(create_room(&ctx, &room_input("42", 2)).await);
    assert!(reason.contains("already exists"), "{reason}");
}

#[tokio::test]
async fn invalid_room_input_fails_with_validation_message() {
    let (ctx, _, _) = setup().await;
    let reason = failure(create_room(&ctx, &room_input("  ", 2)).await);
    assert_eq!(reason, "number is required");
}

#[tokio::test]
async fn booking_overlapping_an_existing_stay_is_rejected() {
    let (ctx, user, room) = setup().await;
    create_booking(&ctx, &user.id, &stay(&room, 10, 13, 2))
        .await
        .ok()
        .expect("first booking");

    let reason = failure(create_booking(&ctx, &user.id, &stay(&room, 12, 15, 1)).await);
    assert!(reason.contains("already booked"), "{reason}");

    let adjacent = create_booking(&ctx, &user.id, &stay(&room, 13, 15, 1)).await;
    assert!(adjacent.is_ok());
}

#[tokio::test]
async fn booking_above_capacity_is_rejected() {
    let (ctx, user, room) = setup().await;
    let reason = failure(create_booking(&ctx, &user.id, &stay(&room, 1, 2, 3)).await);
    assert!(reason.contains("at most 2 guests"), "{reason}");
}

#[tokio::test]
async fn booking_for_unknown_room_fails_rather_than_not_found() {
    let (ctx, user, room) = setup().await;
    let mut input = stay(&room, 1, 2, 1);
    input.room_id = "room-ghost".to_string();
    let reason = failure(create_booking(&ctx, &user.id, &input).await);
    assert_eq!(reason, "selected room does not exist");
}

#[tokio::test]
async fn editing_a_booking_does_not_collide_with_itself() {
    let (ctx, user, room) = setup().await;
    let booking = create_booking(&ctx, &user.id, &stay(&room, 5, 8, 2))
        .await
        .ok()
        .expect("booking");

    let mut shifted = stay(&room, 6, 9, 2);
    shifted.status = Some(BookingStatus::Confirmed);
    let updated = update_booking(&ctx, &booking.id, &shifted)
        .await
        .ok()
        .expect("update");
    assert_eq!(updated.status, BookingStatus::Confirmed);
    assert_eq!(updated.user_id, user.id);
}

#[tokio::test]
async fn status_changes_go_through_on_a_room_under_maintenance() {
    let (ctx, user, room) = setup().await;
    let booking = create_booking(&ctx, &user.id, &stay(&room, 5, 8, 2))
        .await
        .ok()
        .expect("booking");

    let mut closed = room_input("42", 2);
    closed.status = RoomStatus::Maintenance;
    ctx.storage
        .update_room(&room.id, &closed)
        .await
        .expect("update room")
        .expect("room exists");

    let mut checked_in = stay(&room, 5, 8, 2);
    checked_in.status = Some(BookingStatus::CheckedIn);
    let updated = update_booking(&ctx, &booking.id, &checked_in)
        .await
        .ok()
        .expect("status change");
    assert_eq!(updated.status, BookingStatus::CheckedIn);

    let mut moved = stay(&room, 6, 9, 2);
    moved.status = Some(BookingStatus::CheckedIn);
    let reason = failure(update_booking(&ctx, &booking.id, &moved).await);
    assert!(reason.contains("maintenance"), "{reason}");
}

#[tokio::test]
async fn reinstating_a_cancelled_booking_rechecks_the_dates() {
    let (ctx, user, room) = setup().await;
    let mut cancelled = stay(&room, 5, 8, 2);
    cancelled.status = Some(BookingStatus::Cancelled);
    let first = create_booking(&ctx, &user.id, &cancelled)
        .await
        .ok()
        .expect("cancelled booking");
    create_booking(&ctx, &user.id, &stay(&room, 6, 7, 1))
        .await
        .ok()
        .expect("live booking");

    let mut reinstated = stay(&room, 5, 8, 2);
    reinstated.status = Some(BookingStatus::Confirmed);
    let reason = failure(update_booking(&ctx, &first.id, &reinstated).await);
    assert!(reason.contains("already booked"), "{reason}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_never_double_book_a_room() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = std::env::temp_dir().join(format!("hotel_api_race_{suffix}"));
    let database_url = format!(
        "sqlite://{}",
        root.join("race.db").to_string_lossy().replace('\\', "/")
    );
    let storage = Storage::new(&database_url).await.expect("db");
    let user = storage
        .create_user("guest@example.com", "Guest", Role::Guest, "password123")
        .await
        .expect("user");
    let room = storage
        .insert_room(&room_input("42", 2))
        .await
        .expect("room");
    let ctx = ApiContext { storage };

    for night in 1..=5 {
        let mut tasks = Vec::new();
        for _ in 0..12 {
            let ctx = ctx.clone();
            let user_id = user.id.clone();
            let input = stay(&room, night, night + 1, 1);
            tasks.push(tokio::spawn(async move {
                create_booking(&ctx, &user_id, &input).await
            }));
        }

        let mut accepted = 0;
        for task in tasks {
            match task.await.expect("task") {
                ActionResult::Ok(_) => accepted += 1,
                ActionResult::Failed(reason) => {
                    assert!(reason.contains("already booked"), "{reason}")
                }
                ActionResult::NotFound => panic!("unexpected not found"),
            }
        }
        assert_eq!(accepted, 1, "night {night}");
    }

    let stored = get_all_bookings(&ctx).await.ok().expect("bookings");
    assert_eq!(stored.len(), 5);

    drop(ctx);
    std::fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn updating_a_missing_booking_is_not_found() {
    let (ctx, _, room) = setup().await;
    let result = update_booking(&ctx, &BookingId::from("booking-404"), &stay(&room, 1, 2, 1)).await;
    assert_eq!(result, ActionResult::NotFound);
}

#[tokio::test]
async fn room_with_bookings_cannot_be_deleted() {
    let (ctx, user, room) = setup().await;
    create_booking(&ctx, &user.id, &stay(&room, 1, 2, 1))
        .await
        .ok()
        .expect("booking");
    let reason = failure(delete_room(&ctx, &room.id).await);
    assert!(reason.contains("has bookings"), "{reason}");
}

#[tokio::test]
async fn deleting_twice_reports_not_found() {
    let (ctx, _, room) = setup().await;
    assert!(delete_room(&ctx, &room.id).await.is_ok());
    assert_eq!(delete_room(&ctx, &room.id).await, ActionResult::NotFound);
}

#[tokio::test]
async fn authenticate_rejects_wrong_password() {
    let (ctx, _, _) = setup().await;
    let reason = failure(authenticate(&ctx, "guest@example.com", "nope-nope").await);
    assert_eq!(reason, "invalid email or password");

    let user = authenticate(&ctx, "guest@example.com", "password123")
        .await
        .ok()
        .expect("signed in");
    assert_eq!(user.role, Role::Guest);
}

#[tokio::test]
async fn register_refuses_existing_email() {
    let (ctx, _, _) = setup().await;
    let input = RegisterInput {
        name: "Second".to_string(),
        email: "GUEST@example.com".to_string(),
        password: "password456".to_string(),
    };
    let reason = failure(register_user(&ctx, &input).await);
    assert!(reason.contains("already exists"), "{reason}");
}

#[tokio::test]
async fn messages_can_be_listed_per_author_through_the_trait() {
    let (ctx, user, _) = setup().await;
    let actions: &dyn HotelActions = &ctx;
    actions
        .create_message(
            &user.id,
            &MessageInput {
                subject: "Towels".to_string(),
                body: "Could we get two more?".to_string(),
            },
        )
        .await
        .ok()
        .expect("message");

    let mine = actions.get_messages(Some(&user.id)).await.ok().expect("list");
    assert_eq!(mine.len(), 1);
    let none = actions
        .get_messages(Some(&UserId::from("someone-else")))
        .await
        .ok()
        .expect("list");
    assert!(none.is_empty());
}

#[tokio::test]
async fn health_check_passes_on_a_live_database() {
    let (ctx, _, _) = setup().await;
    let actions: &dyn HotelActions = &ctx;
    assert!(actions.health_check().await.is_ok());
}
