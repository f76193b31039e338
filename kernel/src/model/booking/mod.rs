pub mod admission;
pub mod authorization;
pub mod event;
pub mod retention;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use shared::error::{AppError, AppResult};

use crate::model::id::{BookingId, SpaceId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub space_id: SpaceId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub end_time: DateTime<Utc>,
    pub description: String,
}

/// The authenticated identity a booking operation acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: UserId,
    pub is_privileged: bool,
}

/// Half-open `[from, until)` UTC range covering one calendar day in `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl DayWindow {
    pub fn on(date: NaiveDate, offset: FixedOffset) -> AppResult<Self> {
        let out_of_range =
            || AppError::InvalidInput(format!("date {date} is out of the supported range"));
        let from = date
            .and_time(NaiveTime::default())
            .checked_sub_signed(Duration::seconds(offset.local_minus_utc().into()))
            .ok_or_else(out_of_range)?
            .and_utc();
        let until = from
            .checked_add_signed(Duration::days(1))
            .ok_or_else(out_of_range)?;
        Ok(Self { from, until })
    }
}
