use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{BookingId, SpaceId, UserId};

use super::Requester;

#[derive(new, Debug)]
pub struct CreateBooking {
    pub space_id: SpaceId,
    pub requested_by: Requester,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub description: String,
}

#[derive(new, Debug)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub requested_by: Requester,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub description: String,
}

#[derive(new, Debug)]
pub struct DeleteBooking {
    pub booking_id: BookingId,
    pub requested_by: UserId,
}
