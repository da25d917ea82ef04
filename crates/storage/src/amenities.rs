use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use shared::{
    domain::{Activity, ActivityId, Service, ServiceId},
    protocol::{ActivityInput, ServiceInput},
};
use sqlx::{sqlite::SqliteRow, Row};

use crate::Storage;

const ACTIVITY_COLUMNS: &str = "id, title, description, location, starts_at, capacity";

impl Storage {
    pub async fn insert_activity(&self, input: &ActivityInput) -> Result<Activity> {
        let activity = activity_from_input(ActivityId::generate(), input)?;
        sqlx::query(
            "INSERT INTO activities (id, title, description, location, starts_at, capacity)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(activity.id.as_str())
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.location)
        .bind(activity.starts_at)
        .bind(activity.capacity)
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to insert activity '{}'", activity.title))?;
        Ok(activity)
    }

    pub async fn update_activity(
        &self,
        id: &ActivityId,
        input: &ActivityInput,
    ) -> Result<Option<Activity>> {
        let activity = activity_from_input(id.clone(), input)?;
        let result = sqlx::query(
            "UPDATE activities
             SET title = ?, description = ?, location = ?, starts_at = ?, capacity = ?
             WHERE id = ?",
        )
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.location)
        .bind(activity.starts_at)
        .bind(activity.capacity)
        .bind(id.as_str())
        .execute(self.pool())
        .await
        .with_context(|| format!("failed to update activity '{id}'"))?;
        Ok((result.rows_affected() > 0).then_some(activity))
    }

    pub async fn load_activity(&self, id: &ActivityId) -> Result<Option<Activity>> {
        let row = sqlx::query(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(|r| activity_from_row(&r)))
    }

    pub async fn list_activities(&self) -> Result<Vec<Activity>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY starts_at ASC"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(activity_from_row).collect())
    }

    pub async fn delete_activity(&self, id: &ActivityId) -> Result<bool> {
        self.delete_by_id("activities", id.as_str()).await
    }

    pub async fn insert_service(&self, input: &ServiceInput) -> Result<Service> {
        let service = service_from_input(ServiceId::generate(), input);
        sqlx::query("INSERT INTO services (id, name, description, price) VALUES (?, ?, ?, ?)")
            .bind(service.id.as_str())
            .bind(&service.name)
            .bind(&service.description)
            .bind(service.price)
            .execute(self.pool())
            .await
            .with_context(|| format!("failed to insert service '{}'", service.name))?;
        Ok(service)
    }

    pub async fn update_service(
        &self,
        id: &ServiceId,
        input: &ServiceInput,
    ) -> Result<Option<Service>> {
        let service = service_from_input(id.clone(), input);
        let result =
            sqlx::query("UPDATE services SET name = ?, description = ?, price = ? WHERE id = ?")
                .bind(&service.name)
                .bind(&service.description)
                .bind(service.price)
                .bind(id.as_str())
                .execute(self.pool())
                .await
                .with_context(|| format!("failed to update service '{id}'"))?;
        Ok((result.rows_affected() > 0).then_some(service))
    }

    pub async fn load_service(&self, id: &ServiceId) -> Result<Option<Service>> {
        let row = sqlx::query("SELECT id, name, description, price FROM services WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(|r| service_from_row(&r)))
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        let rows = sqlx::query(
            "SELECT id, name, description, price FROM services ORDER BY lower(name) ASC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.iter().map(service_from_row).collect())
    }

    pub async fn delete_service(&self, id: &ServiceId) -> Result<bool> {
        self.delete_by_id("services", id.as_str()).await
    }
}

fn activity_from_input(id: ActivityId, input: &ActivityInput) -> Result<Activity> {
    Ok(Activity {
        id,
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        location: input.location.trim().to_string(),
        starts_at: input.parsed_starts_at()?,
        capacity: input.capacity,
    })
}

fn activity_from_row(r: &SqliteRow) -> Activity {
    Activity {
        id: ActivityId(r.get::<String, _>(0)),
        title: r.get::<String, _>(1),
        description: r.get::<String, _>(2),
        location: r.get::<String, _>(3),
        starts_at: r.get::<NaiveDateTime, _>(4),
        capacity: r.get::<i64, _>(5),
    }
}

fn service_from_input(id: ServiceId, input: &ServiceInput) -> Service {
    Service {
        id,
        name: input.name.trim().to_string(),
        description: input.description.trim().to_string(),
        price: input.price,
    }
}

fn service_from_row(r: &SqliteRow) -> Service {
    Service {
        id: ServiceId(r.get::<String, _>(0)),
        name: r.get::<String, _>(1),
        description: r.get::<String, _>(2),
        price: r.get::<f64, _>(3),
    }
}
