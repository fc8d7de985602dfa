use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::booking::{missing_fields, BookingRequest, BookingResponse, NewBooking};
use crate::AppState;

/// POST /book: reserve a slot and persist it as a confirmed booking.
///
/// The body is parsed as JSON whatever the `Content-Type` says. Presence of
/// the required fields is checked before anything touches the store.
pub async fn book_slot(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidBody(rejection.body_text())
        }
    })?;
    let payload = parse_object(&body)?;

    let missing = missing_fields(&payload);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let request = BookingRequest::from_json(&payload)?;
    let booking = state
        .db
        .insert_booking(&NewBooking::confirmed(request))
        .await?;

    tracing::info!(
        booking_id = %booking.id,
        booking_reference = %booking.booking_reference,
        provider = %booking.provider_name,
        "booking confirmed"
    );

    Ok(Json(BookingResponse::confirmed(&booking)))
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::InvalidBody("expected a JSON object".into())),
        Err(e) => Err(AppError::InvalidBody(e.to_string())),
    }
}
