//! Availability handlers: day and slot listings for the booking wizard.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{AvailableDayDto, AvailableSlotDto, PartySizeParams};
use crate::app_state::AppState;
use crate::domain::DayId;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /availability/days?persons=N` — Days with room for the party.
///
/// Availability is slot-driven: a day appears only when at least one of
/// its slots still fits the whole party. The listing may race with
/// concurrent admissions; the reservation endpoint re-validates.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a non-positive party size.
#[utoipa::path(
    get,
    path = "/api/v1/availability/days",
    tag = "Availability",
    summary = "List available days",
    description = "Returns upcoming days that have at least one time slot with remaining capacity for the requested party size, ordered by date.",
    responses(
        (status = 200, description = "Available days", body = Vec<AvailableDayDto>),
        (status = 400, description = "Invalid party size", body = ErrorResponse),
    )
)]
pub async fn list_days(
    State(state): State<AppState>,
    Query(params): Query<PartySizeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let days = state.booking_service.available_days(params.persons).await?;
    let data: Vec<AvailableDayDto> = days.into_iter().map(AvailableDayDto::from).collect();
    Ok(Json(data))
}

/// `GET /availability/days/:day_id/slots?persons=N` — Future slots on a day.
///
/// # Errors
///
/// Returns [`GatewayError::DayNotFound`] for a stale or unknown day id.
#[utoipa::path(
    get,
    path = "/api/v1/availability/days/{day_id}/slots",
    tag = "Availability",
    summary = "List available time slots",
    description = "Returns time slots on the given day with remaining capacity for the party size, excluding slots already in the past, ordered by time.",
    responses(
        (status = 200, description = "Available slots", body = Vec<AvailableSlotDto>),
        (status = 404, description = "Day not found", body = ErrorResponse),
    )
)]
pub async fn list_slots(
    State(state): State<AppState>,
    Path(day_id): Path<i64>,
    Query(params): Query<PartySizeParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let slots = state
        .booking_service
        .available_times(DayId::new(day_id), params.persons)
        .await?;
    let data: Vec<AvailableSlotDto> = slots.into_iter().map(AvailableSlotDto::from).collect();
    Ok(Json(data))
}

/// Availability routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/availability/days", get(list_days))
        .route("/availability/days/{day_id}/slots", get(list_slots))
}
