use adapter::{database::connect_database_with, repository::booking::BookingRepositoryImpl};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use kernel::{
    model::booking::{
        admission::BookingPolicy,
        retention::{RetentionPolicy, SweepReport},
    },
    repository::booking::BookingRepository,
};
use shared::{config::DatabaseConfig, logging::init_logger};

/// Deletes bookings whose start time lies further in the past than the retention window.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Delete bookings that started more than this many days ago
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(0..))]
    days: i64,

    /// Report what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    let args = Args::parse();

    let pool = connect_database_with(&DatabaseConfig::from_env()?);
    let repo = BookingRepositoryImpl::new(pool, BookingPolicy::default());

    let cutoff = RetentionPolicy::days(args.days).cutoff(Utc::now());
    let report = repo
        .sweep_expired(cutoff, args.dry_run)
        .await
        .context("retention sweep failed")?;

    tracing::info!(
        matched = report.matched,
        deleted = report.deleted,
        dry_run = report.dry_run,
        %cutoff,
        "retention sweep finished"
    );

    for line in render(&report, args.days) {
        println!("{line}");
    }

    Ok(())
}

fn render(report: &SweepReport, days: i64) -> Vec<String> {
    if report.matched == 0 {
        return vec!["No expired bookings to delete".into()];
    }
    if !report.dry_run {
        return vec![format!("Deleted {} expired bookings", report.deleted)];
    }

    let mut lines = vec![format!(
        "Would delete {} bookings older than {} days:",
        report.matched, days
    )];
    lines.extend(report.sample.iter().map(|b| {
        format!(
            "  - ID {}: space {} at {}",
            b.booking_id,
            b.space_id,
            b.start_time.to_rfc3339()
        )
    }));
    let rest = report.not_sampled();
    if rest > 0 {
        lines.push(format!("  ... and {rest} more bookings"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kernel::model::{
        booking::Booking,
        id::{BookingId, SpaceId, UserId},
    };

    fn expired(n: usize) -> Vec<Booking> {
        let start = Utc::now() - Duration::days(3);
        (0..n)
            .map(|_| Booking {
                booking_id: BookingId::new(),
                user_id: UserId::new(),
                space_id: SpaceId::new(),
                start_time: start,
                duration_minutes: 30,
                end_time: start + Duration::minutes(30),
                description: String::new(),
            })
            .collect()
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["cleanup", "--days", "7", "--dry-run"]);
        assert_eq!(args.days, 7);
        assert!(args.dry_run);

        let args = Args::parse_from(["cleanup"]);
        assert_eq!(args.days, 1);
        assert!(!args.dry_run);

        assert!(Args::try_parse_from(["cleanup", "--days", "-1"]).is_err());
    }

    #[test]
    fn dry_run_lists_sample_and_remainder() {
        let report = SweepReport {
            cutoff: Utc::now(),
            dry_run: true,
            matched: 12,
            deleted: 0,
            sample: expired(10),
        };
        let lines = render(&report, 1);
        assert_eq!(lines[0], "Would delete 12 bookings older than 1 days:");
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[11], "  ... and 2 more bookings");
    }

    #[test]
    fn reports_deletions_and_empty_sweeps() {
        let deleted = SweepReport {
            cutoff: Utc::now(),
            dry_run: false,
            matched: 3,
            deleted: 3,
            sample: expired(3),
        };
        assert_eq!(render(&deleted, 1), vec!["Deleted 3 expired bookings"]);

        let empty = SweepReport {
            cutoff: Utc::now(),
            dry_run: true,
            matched: 0,
            deleted: 0,
            sample: Vec::new(),
        };
        assert_eq!(render(&empty, 1), vec!["No expired bookings to delete"]);
    }
}
