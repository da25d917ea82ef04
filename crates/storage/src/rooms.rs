use anyhow::{Context, Result};
use shared::{
    domain::{Room, RoomId, RoomStatus},
    protocol::RoomInput,
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::Storage;

const ROOM_COLUMNS: &str = "id, number, room_type, price_per_night, capacity, status, description";

impl Storage {
    pub async fn insert_room(&self, input: &RoomInput) -> Result<Room> {
        self.insert_room_with_id(RoomId::generate(), input).await
    }

    pub(crate) async fn insert_room_with_id(&self, id: RoomId, input: &RoomInput) -> Result<Room> {
        sqlx::query(
            "INSERT INTO rooms (id, number, room_type, price_per_night, capacity, status, description)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(input.number.trim())
        .bind(input.room_type.trim())
        .bind(input.price_per_night)
        .bind(input.capacity)
        .bind(input.status.as_str())
        .bind(input.description.trim())
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to insert room '{}'", input.number))?;

        Ok(room_from_input(id, input))
    }

    pub async fn update_room(&self, id: &RoomId, input: &RoomInput) -> Result<Option<Room>> {
        let result = sqlx::query(
            "UPDATE rooms
             SET number = ?, room_type = ?, price_per_night = ?, capacity = ?, status = ?, description = ?
             WHERE id = ?",
        )
        .bind(input.number.trim())
        .bind(input.room_type.trim())
        .bind(input.price_per_night)
        .bind(input.capacity)
        .bind(input.status.as_str())
        .bind(input.description.trim())
        .bind(id.as_str())
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to update room '{id}'"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(room_from_input(id.clone(), input)))
    }

    pub async fn load_room(&self, id: &RoomId) -> Result<Option<Room>> {
        let row = sqlx::query(&format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|r| room_from_row(&r)))
    }

    pub async fn list_rooms(&self) -> Result<Vec<Room>> {
        let rows = sqlx::query(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms ORDER BY length(number) ASC, number ASC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(room_from_row).collect())
    }

    pub async fn room_number_taken(&self, number: &str, exclude: Option<&RoomId>) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE number = ? AND id != ?")
                .bind(number.trim())
                .bind(exclude.map(RoomId::as_str).unwrap_or_default())
                .fetch_one(self.pool())
                .await?;
        Ok(count > 0)
    }

    pub async fn delete_room(&self, id: &RoomId) -> Result<bool> {
        self.delete_by_id("rooms", id.as_str()).await
    }
}

fn room_from_input(id: RoomId, input: &RoomInput) -> Room {
    Room {
        id,
        number: input.number.trim().to_string(),
        room_type: input.room_type.trim().to_string(),
        price_per_night: input.price_per_night,
        capacity: input.capacity,
        status: input.status,
        description: input.description.trim().to_string(),
    }
}

fn room_from_row(r: &SqliteRow) -> Room {
    Room {
        id: RoomId(r.get::<String, _>(0)),
        number: r.get::<String, _>(1),
        room_type: r.get::<String, _>(2),
        price_per_night: r.get::<f64, _>(3),
        capacity: r.get::<i64, _>(4),
        status: RoomStatus::parse(&r.get::<String, _>(5)).unwrap_or(RoomStatus::Available),
        description: r.get::<String, _>(6),
    }
}
