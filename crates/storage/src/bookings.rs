use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    domain::{Booking, BookingId, BookingStatus, RoomId, UserId},
    protocol::BookingInput,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::Storage;

const BOOKING_COLUMNS: &str =
    "id, user_id, room_id, guest_name, check_in, check_out, guests_count, status, created_at";

/// Live bookings of a room whose stay intersects another stay. Binds, in
/// order: room id, the booking id to ignore, check-out, check-in.
const LIVE_OVERLAP: &str = "SELECT 1 FROM bookings AS other
     WHERE other.room_id = ?
       AND other.id != ?
       AND other.status != 'cancelled'
       AND other.check_in < ?
       AND other.check_out > ?";

/// Result of a booking write that may not double-book its room.
#[derive(Debug)]
pub enum BookingWrite {
    Saved(Booking),
    Overlapping,
}

impl Storage {
    /// Inserts the booking unless a live booking of the same room overlaps it.
    /// The overlap test and the insert are one statement, so concurrent
    /// writers cannot both pass the check.
    pub async fn insert_booking(
        &self,
        user_id: &UserId,
        input: &BookingInput,
    ) -> Result<BookingWrite> {
        let booking = Booking {
            id: BookingId::generate(),
            user_id: user_id.clone(),
            room_id: RoomId(input.room_id.trim().to_string()),
            guest_name: input.guest_name.trim().to_string(),
            check_in: input.check_in,
            check_out: input.check_out,
            guests_count: input.guests_count,
            status: input.status.unwrap_or(BookingStatus::Pending),
            created_at: Utc::now(),
        };

        let result = sqlx::query(&format!(
            "INSERT INTO bookings (id, user_id, room_id, guest_name, check_in, check_out, guests_count, status, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE ? = 'cancelled' OR NOT EXISTS ({LIVE_OVERLAP})"
        ))
        .bind(booking.id.as_str())
        .bind(booking.user_id.as_str())
        .bind(booking.room_id.as_str())
        .bind(&booking.guest_name)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.guests_count)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.status.as_str())
        .bind(booking.room_id.as_str())
        .bind(booking.id.as_str())
        .bind(booking.check_out)
        .bind(booking.check_in)
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to insert booking for room '{}'", booking.room_id))?;

        if result.rows_affected() == 0 {
            return Ok(BookingWrite::Overlapping);
        }
        Ok(BookingWrite::Saved(booking))
    }

    /// Updates the editable fields; the owner and creation time never change.
    /// Returns `None` when the booking does not exist.
    pub async fn update_booking(
        &self,
        id: &BookingId,
        input: &BookingInput,
    ) -> Result<Option<BookingWrite>> {
        let Some(existing) = self.load_booking(id).await? else {
            return Ok(None);
        };
        let status = input.status.unwrap_or(existing.status);
        let room_id = input.room_id.trim();

        let result = sqlx::query(&format!(
            "UPDATE bookings
             SET room_id = ?, guest_name = ?, check_in = ?, check_out = ?, guests_count = ?, status = ?
             WHERE id = ?
               AND (? = 'cancelled' OR NOT EXISTS ({LIVE_OVERLAP}))"
        ))
        .bind(room_id)
        .bind(input.guest_name.trim())
        .bind(input.check_in)
        .bind(input.check_out)
        .bind(input.guests_count)
        .bind(status.as_str())
        .bind(id.as_str())
        .bind(status.as_str())
        .bind(room_id)
        .bind(id.as_str())
        .bind(input.check_out)
        .bind(input.check_in)
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to update booking '{id}'"))?;

        if result.rows_affected() == 0 {
            // Deleted since it was loaded, or the new stay collides.
            return Ok(self
                .load_booking(id)
                .await?
                .map(|_| BookingWrite::Overlapping));
        }

        Ok(Some(BookingWrite::Saved(Booking {
            room_id: RoomId(room_id.to_string()),
            guest_name: input.guest_name.trim().to_string(),
            check_in: input.check_in,
            check_out: input.check_out,
            guests_count: input.guests_count,
            status,
            ..existing
        })))
    }

    pub async fn load_booking(&self, id: &BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|r| booking_from_row(&r)))
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY check_in DESC, created_at DESC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(booking_from_row).collect())
    }

    pub async fn list_bookings_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ? ORDER BY check_in DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(booking_from_row).collect())
    }

    pub async fn count_bookings_for_room(&self, room_id: &RoomId) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE room_id = ?")
            .bind(room_id.as_str())
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn delete_booking(&self, id: &BookingId) -> Result<bool> {
        self.delete_by_id("bookings", id.as_str()).await
    }
}

fn booking_from_row(r: &SqliteRow) -> Booking {
    Booking {
        id: BookingId(r.get::<String, _>(0)),
        user_id: UserId(r.get::<String, _>(1)),
        room_id: RoomId(r.get::<String, _>(2)),
        guest_name: r.get::<String, _>(3),
        check_in: r.get::<NaiveDate, _>(4),
        check_out: r.get::<NaiveDate, _>(5),
        guests_count: r.get::<i64, _>(6),
        status: BookingStatus::parse(&r.get::<String, _>(7)).unwrap_or(BookingStatus::Pending),
        created_at: r.get::<DateTime<Utc>, _>(8),
    }
}
