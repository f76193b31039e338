use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::model::{
    booking::{authorization::ensure_owner, event::DeleteBooking, Booking},
    id::BookingId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AuthorizedUser},
    model::booking::{
        BookingResponse, BookingsResponse, CreateBookingRequest,
        CreateBookingRequestWithRequester, UpdateBookingRequest, UpdateBookingRequestWithIds,
    },
};

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingResponse>)> {
    req.validate(&())?;

    let booking = registry
        .booking_repository()
        .create(CreateBookingRequestWithRequester::new(user.requester(), req).into())
        .await?;

    if registry.retention_policy().sweep_after_create {
        spawn_retention_sweep(&registry);
    }

    Ok((StatusCode::CREATED, Json(booking.into())))
}

pub async fn show_my_bookings(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    registry
        .booking_repository()
        .find_by_user_id(user.id())
        .await
        .map(BookingsResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: AuthorizedUser,
    AppPath(booking_id): AppPath<BookingId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    req.validate(&())?;

    let booking = find_booking(&registry, booking_id).await?;
    ensure_owner(&booking, user.id())?;

    registry
        .booking_repository()
        .update(UpdateBookingRequestWithIds::new(booking_id, user.requester(), req).into())
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn delete_booking(
    user: AuthorizedUser,
    AppPath(booking_id): AppPath<BookingId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    let booking = find_booking(&registry, booking_id).await?;
    ensure_owner(&booking, user.id())?;

    registry
        .booking_repository()
        .delete(DeleteBooking::new(booking_id, user.id()))
        .await
        .map(|_| StatusCode::OK)
}

async fn find_booking(
    registry: &AppRegistry,
    booking_id: BookingId,
) -> AppResult<Booking> {
    registry
        .booking_repository()
        .find_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("booking ({booking_id}) not found")))
}

// Runs detached from the request; its outcome never reaches the caller.
fn spawn_retention_sweep(registry: &AppRegistry) {
    let repo = registry.booking_repository();
    let cutoff = registry.retention_policy().cutoff(Utc::now());
    tokio::spawn(async move {
        match repo.sweep_expired(cutoff, false).await {
            Ok(report) if report.deleted > 0 => {
                tracing::info!(deleted = report.deleted, %cutoff, "expired bookings removed");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error.message = %e, "retention sweep after booking creation failed");
            }
        }
    });
}
