use crate::database::{model::space::SpaceRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::SpaceId,
    space::{
        event::{CreateSpace, DeleteSpace, UpdateSpace},
        Space, WorkingHours,
    },
};
use kernel::repository::space::SpaceRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct SpaceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl SpaceRepository for SpaceRepositoryImpl {
    async fn create(&self, event: CreateSpace) -> AppResult<SpaceId> {
        let space_id = SpaceId::new();
        sqlx::query(
            r#"
                INSERT INTO spaces (space_id, space_name, description, image_path, work_start, work_end)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(space_id)
        .bind(event.space_name)
        .bind(event.description)
        .bind(event.image_path)
        .bind(event.working_hours.work_start())
        .bind(event.working_hours.work_end())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(space_id)
    }

    async fn find_all(&self) -> AppResult<Vec<Space>> {
        let rows: Vec<SpaceRow> = sqlx::query_as(
            r#"
                SELECT
                    space_id,
                    space_name,
                    description,
                    image_path,
                    work_start,
                    work_end
                FROM spaces
                ORDER BY space_name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Space::try_from).collect()
    }

    async fn find_by_id(&self, space_id: SpaceId) -> AppResult<Option<Space>> {
        let row: Option<SpaceRow> = sqlx::query_as(
            r#"
                SELECT
                    space_id,
                    space_name,
                    description,
                    image_path,
                    work_start,
                    work_end
                FROM spaces
                WHERE space_id = $1
            "#,
        )
        .bind(space_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Space::try_from).transpose()
    }

    async fn update(&self, event: UpdateSpace) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Partial updates may touch only one end of the working hours, so the
        // merged window is validated before writing.
        let current: Space = sqlx::query_as::<_, SpaceRow>(
            r#"
                SELECT
                    space_id,
                    space_name,
                    description,
                    image_path,
                    work_start,
                    work_end
                FROM spaces
                WHERE space_id = $1
                FOR UPDATE
            "#,
        )
        .bind(event.space_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound(format!("space ({}) not found", event.space_id)))?
        .try_into()?;

        let working_hours = WorkingHours::new(
            event
                .work_start
                .unwrap_or(current.working_hours.work_start()),
            event.work_end.unwrap_or(current.working_hours.work_end()),
        )?;

        sqlx::query(
            r#"
                UPDATE spaces
                SET
                    space_name = $2,
                    description = $3,
                    image_path = $4,
                    work_start = $5,
                    work_end = $6
                WHERE space_id = $1
            "#,
        )
        .bind(event.space_id)
        .bind(event.space_name.unwrap_or(current.space_name))
        .bind(event.description.unwrap_or(current.description))
        .bind(event.image_path.or(current.image_path))
        .bind(working_hours.work_start())
        .bind(working_hours.work_end())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn delete(&self, event: DeleteSpace) -> AppResult<()> {
        // Bookings of the space go with it (ON DELETE CASCADE).
        let res = sqlx::query(
            r#"
                DELETE FROM spaces
                WHERE space_id = $1
            "#,
        )
        .bind(event.space_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "space ({}) not found",
                event.space_id
            )));
        }

        Ok(())
    }
}
