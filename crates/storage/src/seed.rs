use anyhow::Result;
use shared::{
    domain::{Role, RoomId, RoomStatus},
    protocol::{ActivityInput, RoomInput, ServiceInput},
};

use crate::Storage;

pub const DEMO_ADMIN_EMAIL: &str = "admin@hotel.local";

impl Storage {
    /// Seeds an admin account and a small catalogue into an empty database.
    ///
    /// Returns `false` without touching anything when users already exist.
    pub async fn seed_demo_data(&self, admin_password: &str) -> Result<bool> {
        if self.count_users().await? > 0 {
            return Ok(false);
        }

        self.create_user(DEMO_ADMIN_EMAIL, "Front Desk", Role::Admin, admin_password)
            .await?;

        let rooms = [
            ("101", "Single", 89.0, 1, "Quiet room facing the garden."),
            ("102", "Double", 129.0, 2, "Queen bed and a writing desk."),
            ("201", "Suite", 249.0, 4, "Two rooms with a sea-view balcony."),
        ];
        for (number, room_type, price, capacity, description) in rooms {
            let input = RoomInput {
                number: number.to_string(),
                room_type: room_type.to_string(),
                price_per_night: price,
                capacity,
                status: RoomStatus::Available,
                description: description.to_string(),
            };
            self.insert_room_with_id(RoomId(format!("room-{number}")), &input)
                .await?;
        }

        for (name, description, price) in [
            ("Airport transfer", "Private car to or from the airport.", 45.0),
            ("Breakfast in bed", "Continental breakfast served to the room.", 18.0),
        ] {
            self.insert_service(&ServiceInput {
                name: name.to_string(),
                description: description.to_string(),
                price,
            })
            .await?;
        }

        self.insert_activity(&ActivityInput {
            title: "Sunset yoga".to_string(),
            description: "Gentle session on the roof terrace.".to_string(),
            location: "Roof terrace".to_string(),
            starts_at: "2026-06-01T19:00".to_string(),
            capacity: 12,
        })
        .await?;

        Ok(true)
    }
}
