use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{BookingStatus, RoomStatus},
    error::ApiError,
};

/// Format used by `datetime-local` form inputs.
pub const FORM_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const NOT_FOUND_MESSAGE: &str = "not found";
const FAILED_MESSAGE: &str = "request failed";

/// Outcome of a single action call.
///
/// Pages consume this by matching; the boolean [`Envelope`] is only the
/// serialized form handed to JSON clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult<T> {
    Ok(T),
    NotFound,
    Failed(String),
}

impl<T> ActionResult<T> {
    pub fn from_lookup(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Ok(value),
            None => Self::NotFound,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::NotFound | Self::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U> {
        match self {
            Self::Ok(value) => ActionResult::Ok(f(value)),
            Self::NotFound => ActionResult::NotFound,
            Self::Failed(reason) => ActionResult::Failed(reason),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::NotFound => Some(NOT_FOUND_MESSAGE),
            Self::Failed(reason) => Some(reason),
        }
    }

    pub fn into_envelope(self) -> Envelope<T> {
        match self {
            Self::Ok(data) => Envelope {
                success: true,
                data: Some(data),
                message: None,
            },
            Self::NotFound => Envelope {
                success: false,
                data: None,
                message: Some(NOT_FOUND_MESSAGE.to_string()),
            },
            Self::Failed(reason) => Envelope {
                success: false,
                data: None,
                message: Some(reason),
            },
        }
    }
}

impl<T> From<ApiError> for ActionResult<T> {
    fn from(value: ApiError) -> Self {
        Self::Failed(value.message)
    }
}

/// `{success, data, message}` wire shape of an action result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> From<Envelope<T>> for ActionResult<T> {
    fn from(value: Envelope<T>) -> Self {
        match (value.success, value.data) {
            (true, Some(data)) => Self::Ok(data),
            (true, None) => Self::NotFound,
            (false, _) => Self::Failed(
                value
                    .message
                    .unwrap_or_else(|| FAILED_MESSAGE.to_string()),
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    #[serde(default, rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        if self.password.chars().count() < 8 {
            return Err(ApiError::validation(
                "password must be at least 8 characters",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInput {
    pub number: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub capacity: i64,
    pub status: RoomStatus,
    #[serde(default)]
    pub description: String,
}

impl RoomInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("number", &self.number)?;
        require_text("room type", &self.room_type)?;
        require_positive_price("price per night", self.price_per_night)?;
        require_positive_count("capacity", self.capacity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingInput {
    pub room_id: String,
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: i64,
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

impl BookingInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("room", &self.room_id)?;
        require_text("guest name", &self.guest_name)?;
        if self.check_out <= self.check_in {
            return Err(ApiError::validation(
                "check-out must be after check-in",
            ));
        }
        require_positive_count("guests", self.guests_count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl GuestInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("phone", &self.phone)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffInput {
    pub name: String,
    pub email: String,
    pub position: String,
    pub phone: String,
}

impl StaffInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_email(&self.email)?;
        require_text("position", &self.position)?;
        require_text("phone", &self.phone)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub starts_at: String,
    pub capacity: i64,
}

impl ActivityInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("title", &self.title)?;
        require_text("location", &self.location)?;
        self.parsed_starts_at()?;
        require_positive_count("capacity", self.capacity)
    }

    pub fn parsed_starts_at(&self) -> Result<NaiveDateTime, ApiError> {
        NaiveDateTime::parse_from_str(self.starts_at.trim(), FORM_DATETIME_FORMAT)
            .map_err(|_| ApiError::validation("start time must look like 2026-01-31T18:30"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

impl ServiceInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_positive_price("price", self.price)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInput {
    pub subject: String,
    pub body: String,
}

impl MessageInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("subject", &self.subject)?;
        require_text("message", &self.body)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), ApiError> {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::validation("a valid email address is required")),
    }
}

fn require_positive_count(field: &str, value: i64) -> Result<(), ApiError> {
    if value < 1 {
        return Err(ApiError::validation(format!("{field} must be at least 1")));
    }
    Ok(())
}

fn require_positive_price(field: &str, value: f64) -> Result<(), ApiError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ApiError::validation(format!("{field} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
