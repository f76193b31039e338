use chrono::{DateTime, Utc};
use kernel::model::{
    booking::Booking,
    id::{BookingId, SpaceId, UserId},
};

#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub space_id: SpaceId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub end_time: DateTime<Utc>,
    pub description: String,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            user_id,
            space_id,
            start_time,
            duration_minutes,
            end_time,
            description,
        } = value;
        Booking {
            booking_id,
            user_id,
            space_id,
            start_time,
            duration_minutes,
            end_time,
            description,
        }
    }
}
