//! Booking admission.
//!
//! A candidate booking is checked against the bookings already present in its
//! space, the space's working hours and the per-user limits. Checks run in a
//! fixed order and the first failure is reported:
//!
//! 1. the start is not in the past
//! 2. the end time is derived from the duration
//! 3. no existing booking lies within `gap` of the candidate
//! 4. the candidate fits the working hours
//! 5. the requester holds fewer than `max_active_per_space` future bookings
//! 6. the duration does not exceed `max_duration_minutes`
//!
//! Privileged requesters skip 4 to 6. Nobody skips 3.

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use shared::{config::BookingConfig, error::BookingRejection};

use crate::model::{
    id::{BookingId, SpaceId},
    space::Space,
};

use super::{Booking, Requester};

#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Required clearance before and after every existing booking.
    pub gap: Duration,
    pub max_duration_minutes: i32,
    pub max_active_per_space: usize,
    /// Offset in which working hours and calendar dates are interpreted.
    pub local_offset: FixedOffset,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self::from(&BookingConfig::default())
    }
}

impl From<&BookingConfig> for BookingPolicy {
    fn from(cfg: &BookingConfig) -> Self {
        Self {
            gap: Duration::minutes(cfg.gap_minutes),
            max_duration_minutes: cfg.max_duration_minutes,
            max_active_per_space: cfg.max_active_per_space,
            local_offset: FixedOffset::east_opt(cfg.utc_offset_minutes * 60)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// A booking as requested, before admission derives its end time.
#[derive(Debug, Clone)]
pub struct BookingCandidate {
    pub space_id: SpaceId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    /// Set when an existing booking is being rescheduled. That booking is not
    /// counted as a conflict with itself and the quota check is skipped.
    pub editing: Option<BookingId>,
}

impl BookingPolicy {
    /// Returns the derived end time when the candidate is admitted.
    pub fn admit(
        &self,
        candidate: &BookingCandidate,
        existing: &[Booking],
        space: &Space,
        now: DateTime<Utc>,
        requester: &Requester,
    ) -> Result<DateTime<Utc>, BookingRejection> {
        let start_time = candidate.start_time;
        if start_time < now {
            return Err(BookingRejection::InvalidTime);
        }

        if candidate.duration_minutes <= 0 {
            return Err(BookingRejection::InvalidInput(
                "duration_minutes must be a positive number of minutes".into(),
            ));
        }
        let end_time = start_time
            .checked_add_signed(Duration::minutes(candidate.duration_minutes.into()))
            .ok_or_else(out_of_range)?;
        let padded_start = start_time
            .checked_sub_signed(self.gap)
            .ok_or_else(out_of_range)?;
        let padded_end = end_time
            .checked_add_signed(self.gap)
            .ok_or_else(out_of_range)?;

        let others = existing.iter().filter(|b| {
            b.space_id == candidate.space_id && Some(b.booking_id) != candidate.editing
        });

        if others
            .clone()
            .any(|b| b.start_time < padded_end && b.end_time > padded_start)
        {
            return Err(BookingRejection::Conflict {
                gap_minutes: self.gap.num_minutes(),
            });
        }

        if requester.is_privileged {
            return Ok(end_time);
        }

        let hours = &space.working_hours;
        let local_start = start_time.with_timezone(&self.local_offset).time();
        let local_end = end_time.with_timezone(&self.local_offset).time();
        if !hours.admits(local_start, local_end) {
            return Err(BookingRejection::OutsideWorkingHours {
                work_start: hours.work_start().to_string(),
                work_end: hours.work_end().to_string(),
            });
        }

        if candidate.editing.is_none() {
            let active = others
                .filter(|b| b.user_id == requester.user_id && b.start_time > now)
                .count();
            if active >= self.max_active_per_space {
                return Err(BookingRejection::QuotaExceeded {
                    limit: self.max_active_per_space,
                });
            }
        }

        if candidate.duration_minutes > self.max_duration_minutes {
            return Err(BookingRejection::DurationTooLong {
                limit: self.max_duration_minutes,
            });
        }

        Ok(end_time)
    }
}

fn out_of_range() -> BookingRejection {
    BookingRejection::InvalidInput("booking time is out of the supported range".into())
}
