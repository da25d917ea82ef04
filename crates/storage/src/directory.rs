use anyhow::{Context, Result};
use shared::{
    domain::{Guest, GuestId, Staff, StaffId},
    protocol::{GuestInput, StaffInput},
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::Storage;

impl Storage {
    pub async fn insert_guest(&self, input: &GuestInput) -> Result<Guest> {
        let guest = guest_from_input(GuestId::generate(), input);
        sqlx::query("INSERT INTO guests (id, name, email, phone, notes) VALUES (?, ?, ?, ?, ?)")
            .bind(guest.id.as_str())
            .bind(&guest.name)
            .bind(&guest.email)
            .bind(&guest.phone)
            .bind(&guest.notes)
            .execute(self.pool())
            .await
            .with_context(|| format!("failed to insert guest '{}'", guest.name))?;
        Ok(guest)
    }

    pub async fn update_guest(&self, id: &GuestId, input: &GuestInput) -> Result<Option<Guest>> {
        let guest = guest_from_input(id.clone(), input);
        let result =
            sqlx::query("UPDATE guests SET name = ?, email = ?, phone = ?, notes = ? WHERE id = ?")
                .bind(&guest.name)
                .bind(&guest.email)
                .bind(&guest.phone)
                .bind(&guest.notes)
                .bind(id.as_str())
                .execute(self.pool())
                .await
                .with_context(|| format!("failed to update guest '{id}'"))?;
        Ok((result.rows_affected() > 0).then_some(guest))
    }

    pub async fn load_guest(&self, id: &GuestId) -> Result<Option<Guest>> {
        let row = sqlx::query("SELECT id, name, email, phone, notes FROM guests WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|r| guest_from_row(&r)))
    }

    pub async fn list_guests(&self) -> Result<Vec<Guest>> {
        let rows =
            sqlx::query("SELECT id, name, email, phone, notes FROM guests ORDER BY lower(name) ASC")
                .fetch_all(self.pool())
                .await?;
        Ok(rows.iter().map(guest_from_row).collect())
    }

    pub async fn delete_guest(&self, id: &GuestId) -> Result<bool> {
        self.delete_by_id("guests", id.as_str()).await
    }

    pub async fn insert_staff(&self, input: &StaffInput) -> Result<Staff> {
        let staff = staff_from_input(StaffId::generate(), input);
        sqlx::query("INSERT INTO staff (id, name, email, position, phone) VALUES (?, ?, ?, ?, ?)")
            .bind(staff.id.as_str())
            .bind(&staff.name)
            .bind(&staff.email)
            .bind(&staff.position)
            .bind(&staff.phone)
            .execute(self.pool())
            .await
            .with_context(|| format!("failed to insert staff member '{}'", staff.name))?;
        Ok(staff)
    }

    pub async fn update_staff(&self, id: &StaffId, input: &StaffInput) -> Result<Option<Staff>> {
        let staff = staff_from_input(id.clone(), input);
        let result = sqlx::query(
            "UPDATE staff SET name = ?, email = ?, position = ?, phone = ? WHERE id = ?",
        )
        .bind(&staff.name)
        .bind(&staff.email)
        .bind(&staff.position)
        .bind(&staff.phone)
        .bind(id.as_str())
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to update staff member '{id}'"))?;
        Ok((result.rows_affected() > 0).then_some(staff))
    }

    pub async fn load_staff(&self, id: &StaffId) -> Result<Option<Staff>> {
        let row = sqlx::query("SELECT id, name, email, position, phone FROM staff WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|r| staff_from_row(&r)))
    }

    pub async fn list_staff(&self) -> Result<Vec<Staff>> {
        let rows = sqlx::query(
            "SELECT id, name, email, position, phone FROM staff ORDER BY lower(name) ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(staff_from_row).collect())
    }

    pub async fn delete_staff(&self, id: &StaffId) -> Result<bool> {
        self.delete_by_id("staff", id.as_str()).await
    }
}

fn guest_from_input(id: GuestId, input: &GuestInput) -> Guest {
    Guest {
        id,
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        phone: input.phone.trim().to_string(),
        notes: input.notes.trim().to_string(),
    }
}

fn guest_from_row(r: &SqliteRow) -> Guest {
    Guest {
        id: GuestId(r.get::<String, _>(0)),
        name: r.get::<String, _>(1),
        email: r.get::<String, _>(2),
        phone: r.get::<String, _>(3),
        notes: r.get::<String, _>(4),
    }
}

fn staff_from_input(id: StaffId, input: &StaffInput) -> Staff {
    Staff {
        id,
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        position: input.position.trim().to_string(),
        phone: input.phone.trim().to_string(),
    }
}

fn staff_from_row(r: &SqliteRow) -> Staff {
    Staff {
        id: StaffId(r.get::<String, _>(0)),
        name: r.get::<String, _>(1),
        email: r.get::<String, _>(2),
        position: r.get::<String, _>(3),
        phone: r.get::<String, _>(4),
    }
}
