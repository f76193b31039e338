use chrono::{DateTime, Duration, Utc};
use shared::config::RetentionConfig;

use super::Booking;

/// Upper bound of rows a sweep reports back for inspection.
pub const SWEEP_SAMPLE_LIMIT: i64 = 10;

/// Housekeeping rule for bookings whose start lies far enough in the past.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub window: Duration,
    pub sweep_after_create: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from(&RetentionConfig::default())
    }
}

impl From<&RetentionConfig> for RetentionPolicy {
    fn from(cfg: &RetentionConfig) -> Self {
        Self {
            window: window_of(cfg.days),
            sweep_after_create: cfg.sweep_after_create,
        }
    }
}

impl RetentionPolicy {
    pub fn days(days: i64) -> Self {
        Self {
            window: window_of(days),
            ..Self::default()
        }
    }

    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

// Windows too large for a `Duration` saturate, which sweeps everything in the past.
fn window_of(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(Duration::MAX)
}

#[derive(Debug)]
pub struct SweepReport {
    pub cutoff: DateTime<Utc>,
    pub dry_run: bool,
    pub matched: u64,
    pub deleted: u64,
    /// Most recent expired bookings, at most `SWEEP_SAMPLE_LIMIT` of them.
    pub sample: Vec<Booking>,
}

impl SweepReport {
    pub fn not_sampled(&self) -> u64 {
        self.matched.saturating_sub(self.sample.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::{BookingId, SpaceId, UserId};

    fn started_at(start_time: DateTime<Utc>) -> Booking {
        Booking {
            booking_id: BookingId::new(),
            user_id: UserId::new(),
            space_id: SpaceId::new(),
            start_time,
            duration_minutes: 60,
            end_time: start_time + Duration::minutes(60),
            description: String::new(),
        }
    }

    #[test]
    fn cutoff_trails_now_by_the_window() {
        let now = Utc::now();
        assert_eq!(RetentionPolicy::days(1).cutoff(now), now - Duration::days(1));
        assert_eq!(RetentionPolicy::days(7).cutoff(now), now - Duration::days(7));
        assert_eq!(RetentionPolicy::days(0).cutoff(now), now);
    }

    #[test]
    fn huge_window_saturates_instead_of_panicking() {
        let cutoff = RetentionPolicy::days(i64::MAX).cutoff(Utc::now());
        assert_eq!(cutoff, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn default_matches_config_defaults() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.window, Duration::days(1));
        assert!(!policy.sweep_after_create);
    }

    #[test]
    fn counts_rows_left_out_of_the_sample() {
        let report = SweepReport {
            cutoff: Utc::now(),
            dry_run: true,
            matched: 14,
            deleted: 0,
            sample: vec![started_at(Utc::now()); 10],
        };
        assert_eq!(report.not_sampled(), 4);
    }
}
