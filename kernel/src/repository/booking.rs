use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::error::AppResult;

use crate::model::{
    booking::{
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        retention::SweepReport,
        Booking,
    },
    id::{BookingId, SpaceId, UserId},
};

#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    // Admits and stores a new booking; the owner comes from `requested_by`.
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    // Re-admits an existing booking with new times.
    async fn update(&self, event: UpdateBooking) -> AppResult<Booking>;
    async fn delete(&self, event: DeleteBooking) -> AppResult<()>;
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // Bookings of a space starting on the given local calendar day, oldest first.
    async fn find_by_space_on_date(
        &self,
        space_id: SpaceId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>>;
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>>;
    // Removes bookings that started before `cutoff`; reports only when `dry_run`.
    async fn sweep_expired(&self, cutoff: DateTime<Utc>, dry_run: bool)
        -> AppResult<SweepReport>;
}
