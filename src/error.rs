//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! The admission and cancellation paths only ever produce typed variants;
//! no storage fault escapes as a panic.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BookingId, DayId, SlotId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "message": "time slot is full for the requested party size",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category           | HTTP Status                 |
/// |-----------|--------------------|-----------------------------|
/// | 1000–1999 | Validation         | 400 Bad Request             |
/// | 2000–2999 | Not Found          | 404 Not Found               |
/// | 3000–3999 | Server / Store     | 500 / 503                   |
/// | 4000–4999 | Admission rejected | 409 Conflict                |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed before reaching the store.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Day with the given id does not exist (e.g. stale selection after
    /// a schedule reset).
    #[error("day not found: {0}")]
    DayNotFound(DayId),

    /// Time slot does not exist or does not belong to the referenced day.
    #[error("time slot not found: {0}")]
    SlotNotFound(SlotId),

    /// Booking with the given id does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The identity holds no active booking.
    #[error("no active booking for user {0}")]
    NoActiveBooking(UserId),

    /// Remaining slot capacity at commit time is below the requested
    /// party size.
    #[error("time slot is full for the requested party size")]
    SlotFull,

    /// The identity already holds an active booking; the ledger enforces
    /// at most one.
    #[error("identity already holds an active booking")]
    DuplicateBooking,

    /// The durable store is unreachable or aborted the transaction for
    /// infrastructure reasons. Safe to retry the whole flow once.
    #[error("store unavailable: {0}")]
    Store(String),

    /// Internal invariant violation (e.g. malformed row data).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::DayNotFound(_) => 2001,
            Self::SlotNotFound(_) => 2002,
            Self::BookingNotFound(_) => 2003,
            Self::NoActiveBooking(_) => 2004,
            Self::SlotFull => 4001,
            Self::DuplicateBooking => 4002,
            Self::Store(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::DayNotFound(_)
            | Self::SlotNotFound(_)
            | Self::BookingNotFound(_)
            | Self::NoActiveBooking(_) => StatusCode::NOT_FOUND,
            Self::SlotFull | Self::DuplicateBooking => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wraps a storage driver error as [`GatewayError::Store`].
    #[must_use]
    pub fn store(err: sqlx::Error) -> Self {
        Self::Store(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_variants_map_to_conflict() {
        assert_eq!(GatewayError::SlotFull.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            GatewayError::DuplicateBooking.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(GatewayError::SlotFull.error_code(), 4001);
        assert_eq!(GatewayError::DuplicateBooking.error_code(), 4002);
    }

    #[test]
    fn not_found_variants_map_to_404() {
        let errors = [
            GatewayError::DayNotFound(DayId::new(1)),
            GatewayError::SlotNotFound(SlotId::new(1)),
            GatewayError::BookingNotFound(BookingId::new(1)),
            GatewayError::NoActiveBooking(UserId::new(1)),
        ];
        for err in errors {
            assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
            assert!((2000..3000).contains(&err.error_code()));
        }
    }

    #[test]
    fn store_failure_is_service_unavailable() {
        let err = GatewayError::Store("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn validation_failure_is_bad_request() {
        let err = GatewayError::InvalidRequest("party size must be at least 1".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn error_envelope_exposes_a_named_schema() {
        assert_eq!(ErrorResponse::name(), "ErrorResponse");
        assert_eq!(ErrorBody::name(), "ErrorBody");
    }
}
