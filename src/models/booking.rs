use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Status assigned to every booking created through `POST /book`.
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Required request keys, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "provider_name",
    "service_type",
    "date",
    "time_slot",
    "booking_reference",
];

/// A booking as stored in the `book` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: String,
    pub provider_name: String,
    pub service_type: String,
    pub date: String,
    pub time_slot: String,
    pub available_spots: Option<i64>,
    pub booking_reference: String,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn confirmation_message(&self) -> String {
        format!(
            "Booking confirmed for {} ({}) on {} at {}.",
            self.provider_name, self.service_type, self.date, self.time_slot
        )
    }
}

/// A fully populated booking that has not been written yet.
///
/// Built only through [`NewBooking::confirmed`], so id, status and
/// timestamp never depend on column defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub id: String,
    pub provider_name: String,
    pub service_type: String,
    pub date: String,
    pub time_slot: String,
    pub available_spots: Option<i64>,
    pub booking_reference: String,
    pub status: String,
    pub booked_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn confirmed(request: BookingRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_name: request.provider_name,
            service_type: request.service_type,
            date: request.date,
            time_slot: request.time_slot,
            available_spots: request.available_spots,
            booking_reference: request.booking_reference,
            status: STATUS_CONFIRMED.to_string(),
            booked_at: Utc::now(),
        }
    }
}

/// Typed view of a `POST /book` payload after conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub provider_name: String,
    pub service_type: String,
    pub date: String,
    pub time_slot: String,
    pub available_spots: Option<i64>,
    pub booking_reference: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum BookingBuildError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be a string, number or boolean")]
    UnsupportedValue { field: &'static str },

    #[error("available_spots must be an integer, got {value}")]
    InvalidAvailableSpots { value: String },
}

impl BookingRequest {
    /// Converts a JSON object into a request. Presence is checked separately
    /// by [`missing_fields`]; this only fails on values that cannot be stored.
    pub fn from_json(body: &Map<String, Value>) -> Result<Self, BookingBuildError> {
        Ok(Self {
            provider_name: text_field(body, "provider_name")?,
            service_type: text_field(body, "service_type")?,
            date: text_field(body, "date")?,
            time_slot: text_field(body, "time_slot")?,
            available_spots: available_spots(body)?,
            booking_reference: text_field(body, "booking_reference")?,
        })
    }
}

/// Returns the required fields that are absent or blank, in [`REQUIRED_FIELDS`] order.
pub fn missing_fields(body: &Map<String, Value>) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| body.get(*field).map_or(true, is_blank))
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn text_field(body: &Map<String, Value>, field: &'static str) -> Result<String, BookingBuildError> {
    match body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(BookingBuildError::UnsupportedValue { field })
        }
        Some(Value::Null) | None => Err(BookingBuildError::MissingField { field }),
    }
}

fn available_spots(body: &Map<String, Value>) -> Result<Option<i64>, BookingBuildError> {
    let Some(value) = body.get("available_spots") else {
        return Ok(None);
    };
    let invalid = || BookingBuildError::InvalidAvailableSpots {
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_i64().map(Some).ok_or_else(invalid),
        Value::String(s) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Body shared by every `POST /book` response, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub booking_reference: Option<String>,
}

impl BookingResponse {
    pub fn confirmed(booking: &Booking) -> Self {
        Self {
            success: true,
            message: booking.confirmation_message(),
            booking_reference: Some(booking.booking_reference.clone()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            booking_reference: None,
        }
    }
}
