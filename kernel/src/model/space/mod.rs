pub mod event;

use chrono::NaiveTime;
use shared::error::{AppError, AppResult};

use crate::model::id::SpaceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub space_id: SpaceId,
    pub space_name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub working_hours: WorkingHours,
}

/// Daily opening window of a space, `work_start < work_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    work_start: NaiveTime,
    work_end: NaiveTime,
}

impl WorkingHours {
    pub fn new(work_start: NaiveTime, work_end: NaiveTime) -> AppResult<Self> {
        if work_start >= work_end {
            return Err(AppError::InvalidInput(format!(
                "work_start ({work_start}) must be earlier than work_end ({work_end})"
            )));
        }
        Ok(Self {
            work_start,
            work_end,
        })
    }

    pub fn work_start(&self) -> NaiveTime {
        self.work_start
    }

    pub fn work_end(&self) -> NaiveTime {
        self.work_end
    }

    /// Start may sit on opening time but not on closing time; the end may sit
    /// on closing time but not on opening time.
    pub fn admits(&self, start: NaiveTime, end: NaiveTime) -> bool {
        (self.work_start <= start && start < self.work_end)
            && (self.work_start < end && end <= self.work_end)
    }
}
