//! Booking handlers: reserve, lookup, self-cancel.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{BookingConfirmationDto, BookingDto, CreateBookingRequest};
use crate::app_state::AppState;
use crate::domain::UserId;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /bookings` — Reserve seats in a time slot.
///
/// The capacity check and insert run as one exclusive transaction;
/// whichever competing request commits first wins the remaining seats.
///
/// # Errors
///
/// Returns [`GatewayError::SlotFull`], [`GatewayError::DuplicateBooking`],
/// [`GatewayError::SlotNotFound`], or [`GatewayError::InvalidRequest`].
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Atomically re-checks slot capacity and the one-booking-per-identity rule, then commits the reservation. Rejections are typed: slot full, duplicate booking, or stale slot selection.",
    responses(
        (status = 201, description = "Booking confirmed", body = BookingConfirmationDto),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Day or slot not found", body = ErrorResponse),
        (status = 409, description = "Slot full or identity already booked", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let confirmation = state.booking_service.reserve(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingConfirmationDto::from(confirmation)),
    ))
}

/// `GET /bookings/user/:user_id` — The identity's current booking.
///
/// # Errors
///
/// Returns [`GatewayError::NoActiveBooking`] when none exists.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/user/{user_id}",
    tag = "Bookings",
    summary = "Look up the current booking",
    description = "Returns the single active booking held by the identity, joined with its date and time.",
    responses(
        (status = 200, description = "Current booking", body = BookingDto),
        (status = 404, description = "No active booking", body = ErrorResponse),
    )
)]
pub async fn get_user_booking(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    let details = state
        .booking_service
        .booking_for_user(UserId::new(user_id))
        .await?;
    Ok(Json(BookingDto::from(details)))
}

/// `DELETE /bookings/user/:user_id` — Self-service cancellation.
///
/// Capacity is freed implicitly; remaining seats are always derived by
/// aggregation.
///
/// # Errors
///
/// Returns [`GatewayError::NoActiveBooking`] when there is nothing to
/// cancel.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/user/{user_id}",
    tag = "Bookings",
    summary = "Cancel the current booking",
    description = "Deletes the identity's active booking, freeing its seats for other parties.",
    responses(
        (status = 204, description = "Booking cancelled"),
        (status = 404, description = "No active booking", body = ErrorResponse),
    )
)]
pub async fn cancel_user_booking(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .booking_service
        .cancel_by_user(UserId::new(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route(
            "/bookings/user/{user_id}",
            axum::routing::get(get_user_booking).delete(cancel_user_booking),
        )
}
