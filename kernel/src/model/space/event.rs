use chrono::NaiveTime;

use crate::model::id::SpaceId;

use super::WorkingHours;

pub struct CreateSpace {
    pub space_name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub working_hours: WorkingHours,
}

/// Fields left as `None` keep their stored value.
#[derive(Debug)]
pub struct UpdateSpace {
    pub space_id: SpaceId,
    pub space_name: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub work_start: Option<NaiveTime>,
    pub work_end: Option<NaiveTime>,
}

#[derive(Debug)]
pub struct DeleteSpace {
    pub space_id: SpaceId,
}
