use chrono::NaiveTime;
use kernel::model::{
    id::SpaceId,
    space::{Space, WorkingHours},
};
use shared::error::{AppError, AppResult};

#[derive(sqlx::FromRow)]
pub struct SpaceRow {
    pub space_id: SpaceId,
    pub space_name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
}

// The table carries a CHECK constraint, so a failure here means the schema drifted.
impl TryFrom<SpaceRow> for Space {
    type Error = AppError;

    fn try_from(value: SpaceRow) -> AppResult<Self> {
        let SpaceRow {
            space_id,
            space_name,
            description,
            image_path,
            work_start,
            work_end,
        } = value;
        let working_hours = WorkingHours::new(work_start, work_end).map_err(|_| {
            AppError::ConversionEntityError(format!(
                "space {space_id} has invalid working hours {work_start} - {work_end}"
            ))
        })?;
        Ok(Space {
            space_id,
            space_name,
            description,
            image_path,
            working_hours,
        })
    }
}
