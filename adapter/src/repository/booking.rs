use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use kernel::model::{
    booking::{
        admission::{BookingCandidate, BookingPolicy},
        event::{CreateBooking, DeleteBooking, UpdateBooking},
        retention::{SweepReport, SWEEP_SAMPLE_LIMIT},
        Booking, DayWindow,
    },
    id::{BookingId, SpaceId, UserId},
    space::Space,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult, BookingRejection};

use crate::database::{
    model::{booking::BookingRow, space::SpaceRow},
    ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
    policy: BookingPolicy,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        // Locking the space row serializes admissions per space: a concurrent
        // request for the same space waits here until this one commits.
        let space = self.lock_space(&mut tx, event.space_id).await?;
        let existing = self.fetch_space_bookings(&mut tx, event.space_id).await?;

        let candidate = BookingCandidate {
            space_id: event.space_id,
            start_time: event.start_time,
            duration_minutes: event.duration_minutes,
            editing: None,
        };
        let end_time = self.policy.admit(
            &candidate,
            &existing,
            &space,
            Utc::now(),
            &event.requested_by,
        )?;

        let booking = Booking {
            booking_id: BookingId::new(),
            user_id: event.requested_by.user_id,
            space_id: event.space_id,
            start_time: event.start_time,
            duration_minutes: event.duration_minutes,
            end_time,
            description: event.description,
        };

        let res = sqlx::query(
            r#"
                INSERT INTO bookings
                (booking_id, user_id, space_id, start_time, duration_minutes, end_time, description)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.user_id)
        .bind(booking.space_id)
        .bind(booking.start_time)
        .bind(booking.duration_minutes)
        .bind(booking.end_time)
        .bind(&booking.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| self.write_error(e))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(|e| self.commit_error(e))?;

        tracing::info!(
            booking_id = %booking.booking_id,
            space_id = %booking.space_id,
            user_id = %booking.user_id,
            "booking created"
        );

        Ok(booking)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        self.set_transaction_serializable(&mut tx).await?;

        let current: Booking = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                FROM bookings
                WHERE booking_id = $1 AND user_id = $2
                FOR UPDATE
            "#,
        )
        .bind(event.booking_id)
        .bind(event.requested_by.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| self.write_error(e))?
        .map(Booking::from)
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("booking ({}) not found", event.booking_id))
        })?;

        let space = self.lock_space(&mut tx, current.space_id).await?;
        let existing = self.fetch_space_bookings(&mut tx, current.space_id).await?;

        let candidate = BookingCandidate {
            space_id: current.space_id,
            start_time: event.start_time,
            duration_minutes: event.duration_minutes,
            editing: Some(current.booking_id),
        };
        let end_time = self.policy.admit(
            &candidate,
            &existing,
            &space,
            Utc::now(),
            &event.requested_by,
        )?;

        let booking = Booking {
            start_time: event.start_time,
            duration_minutes: event.duration_minutes,
            end_time,
            description: event.description,
            ..current
        };

        sqlx::query(
            r#"
                UPDATE bookings
                SET
                    start_time = $2,
                    duration_minutes = $3,
                    end_time = $4,
                    description = $5
                WHERE booking_id = $1
            "#,
        )
        .bind(booking.booking_id)
        .bind(booking.start_time)
        .bind(booking.duration_minutes)
        .bind(booking.end_time)
        .bind(&booking.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| self.write_error(e))?;

        tx.commit().await.map_err(|e| self.commit_error(e))?;

        Ok(booking)
    }

    async fn delete(&self, event: DeleteBooking) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM bookings
                WHERE booking_id = $1 AND user_id = $2
            "#,
        )
        .bind(event.booking_id)
        .bind(event.requested_by)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "booking ({}) not found",
                event.booking_id
            )));
        }

        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                FROM bookings
                WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Booking::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_space_on_date(
        &self,
        space_id: SpaceId,
        date: NaiveDate,
    ) -> AppResult<Vec<Booking>> {
        let space_exists: Option<(SpaceId,)> =
            sqlx::query_as("SELECT space_id FROM spaces WHERE space_id = $1")
                .bind(space_id)
                .fetch_optional(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;
        if space_exists.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "space ({space_id}) not found"
            )));
        }

        let window = DayWindow::on(date, self.policy.local_offset)?;
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                FROM bookings
                WHERE space_id = $1
                  AND start_time >= $2
                  AND start_time < $3
                ORDER BY start_time ASC
            "#,
        )
        .bind(space_id)
        .bind(window.from)
        .bind(window.until)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                FROM bookings
                WHERE user_id = $1
                ORDER BY start_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn sweep_expired(&self, cutoff: DateTime<Utc>, dry_run: bool) -> AppResult<SweepReport> {
        let (matched,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE start_time < $1")
                .bind(cutoff)
                .fetch_one(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?;

        let sample: Vec<Booking> = if matched > 0 {
            sqlx::query_as::<_, BookingRow>(
                r#"
                    SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                    FROM bookings
                    WHERE start_time < $1
                    ORDER BY start_time DESC
                    LIMIT $2
                "#,
            )
            .bind(cutoff)
            .bind(SWEEP_SAMPLE_LIMIT)
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?
            .into_iter()
            .map(Booking::from)
            .collect()
        } else {
            Vec::new()
        };

        let deleted = if dry_run || matched == 0 {
            0
        } else {
            sqlx::query("DELETE FROM bookings WHERE start_time < $1")
                .bind(cutoff)
                .execute(self.db.inner_ref())
                .await
                .map_err(AppError::SpecificOperationError)?
                .rows_affected()
        };

        Ok(SweepReport {
            cutoff,
            dry_run,
            matched: matched.max(0) as u64,
            deleted,
            sample,
        })
    }
}

impl BookingRepositoryImpl {
    // Admission reads every booking of the space and then inserts; running
    // both at SERIALIZABLE keeps two overlapping requests from both committing.
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    async fn lock_space(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        space_id: SpaceId,
    ) -> AppResult<Space> {
        sqlx::query_as::<_, SpaceRow>(
            r#"
                SELECT space_id, space_name, description, image_path, work_start, work_end
                FROM spaces
                WHERE space_id = $1
                FOR UPDATE
            "#,
        )
        .bind(space_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| self.write_error(e))?
        .ok_or_else(|| AppError::EntityNotFound(format!("space ({space_id}) not found")))?
        .try_into()
    }

    async fn fetch_space_bookings(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        space_id: SpaceId,
    ) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, space_id, start_time, duration_minutes, end_time, description
                FROM bookings
                WHERE space_id = $1
                ORDER BY start_time ASC
            "#,
        )
        .bind(space_id)
        .fetch_all(&mut **tx)
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(|e| self.write_error(e))
    }

    // A serialization failure means a concurrent admission on the same space
    // won; report it the way a detected overlap is reported.
    fn write_error(&self, e: sqlx::Error) -> AppError {
        if is_serialization_failure(&e) {
            return self.conflict();
        }
        AppError::SpecificOperationError(e)
    }

    fn commit_error(&self, e: sqlx::Error) -> AppError {
        if is_serialization_failure(&e) {
            return self.conflict();
        }
        AppError::TransactionError(e)
    }

    fn conflict(&self) -> AppError {
        BookingRejection::Conflict {
            gap_minutes: self.policy.gap.num_minutes(),
        }
        .into()
    }
}

fn is_serialization_failure(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("40001"),
        _ => false,
    }
}
