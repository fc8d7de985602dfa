use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::models::booking::{BookingBuildError, BookingResponse};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid request body: request body exceeds size limit")]
    PayloadTooLarge,

    #[error("Booking failed: {0}")]
    Booking(#[from] BookingBuildError),

    #[error("Booking failed: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Booking(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::MissingFields(fields) => {
                tracing::warn!(missing = ?fields, "booking rejected: missing required fields");
            }
            AppError::InvalidBody(e) => {
                tracing::warn!("booking rejected: invalid body: {}", e);
            }
            AppError::PayloadTooLarge => {
                tracing::warn!("booking rejected: body over size limit");
            }
            AppError::Booking(e) => {
                tracing::error!("booking construction failed: {}", e);
            }
            AppError::Store(e) => {
                tracing::error!("booking persistence failed: {}", e);
            }
        }

        (self.status(), Json(BookingResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message() {
        let err = AppError::MissingFields(vec!["service_type", "date"]);
        assert_eq!(err.to_string(), "Missing required fields: service_type, date");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_build_error_is_server_error() {
        let err = AppError::from(BookingBuildError::InvalidAvailableSpots {
            value: "\"many\"".into(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Booking failed: available_spots must be an integer, got \"many\""
        );
    }

    #[test]
    fn test_store_error_embeds_raw_text() {
        let err = AppError::from(StoreError::from(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            format!("Booking failed: {}", sqlx::Error::PoolTimedOut)
        );
    }
}
