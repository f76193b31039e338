use chrono::NaiveTime;
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::SpaceId,
    space::{
        event::{CreateSpace, UpdateSpace},
        Space, WorkingHours,
    },
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

fn default_work_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

fn default_work_end() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    #[garde(length(min = 1, max = 255))]
    pub space_name: String,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
    #[garde(length(min = 1))]
    pub image_path: Option<String>,
    #[garde(skip)]
    #[serde(default = "default_work_start")]
    pub work_start: NaiveTime,
    #[garde(skip)]
    #[serde(default = "default_work_end")]
    pub work_end: NaiveTime,
}

impl TryFrom<CreateSpaceRequest> for CreateSpace {
    type Error = AppError;

    fn try_from(value: CreateSpaceRequest) -> Result<Self, Self::Error> {
        let CreateSpaceRequest {
            space_name,
            description,
            image_path,
            work_start,
            work_end,
        } = value;
        Ok(CreateSpace {
            space_name,
            description,
            image_path,
            working_hours: WorkingHours::new(work_start, work_end)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    #[garde(length(min = 1, max = 255))]
    pub space_name: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(length(min = 1))]
    pub image_path: Option<String>,
    #[garde(skip)]
    pub work_start: Option<NaiveTime>,
    #[garde(skip)]
    pub work_end: Option<NaiveTime>,
}

#[derive(new)]
pub struct UpdateSpaceRequestWithIds(SpaceId, UpdateSpaceRequest);

impl From<UpdateSpaceRequestWithIds> for UpdateSpace {
    fn from(value: UpdateSpaceRequestWithIds) -> Self {
        let UpdateSpaceRequestWithIds(
            space_id,
            UpdateSpaceRequest {
                space_name,
                description,
                image_path,
                work_start,
                work_end,
            },
        ) = value;
        UpdateSpace {
            space_id,
            space_name,
            description,
            image_path,
            work_start,
            work_end,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacesResponse {
    pub items: Vec<SpaceResponse>,
}

impl From<Vec<Space>> for SpacesResponse {
    fn from(value: Vec<Space>) -> Self {
        Self {
            items: value.into_iter().map(SpaceResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceResponse {
    pub space_id: SpaceId,
    pub space_name: String,
    pub description: String,
    pub image_path: Option<String>,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
}

impl From<Space> for SpaceResponse {
    fn from(value: Space) -> Self {
        let Space {
            space_id,
            space_name,
            description,
            image_path,
            working_hours,
        } = value;
        Self {
            space_id,
            space_name,
            description,
            image_path,
            work_start: working_hours.work_start(),
            work_end: working_hours.work_end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_hours_default_to_office_day() {
        let req: CreateSpaceRequest =
            serde_json::from_value(serde_json::json!({ "spaceName": "Focus Room" })).unwrap();
        assert!(req.validate(&()).is_ok());

        let event = CreateSpace::try_from(req).unwrap();
        assert_eq!(event.working_hours.work_start(), default_work_start());
        assert_eq!(event.working_hours.work_end(), default_work_end());
    }

    #[test]
    fn inverted_working_hours_are_invalid_input() {
        let req: CreateSpaceRequest = serde_json::from_value(serde_json::json!({
            "spaceName": "Late Room",
            "workStart": "21:00:00",
            "workEnd": "09:00:00",
        }))
        .unwrap();
        assert!(matches!(
            CreateSpace::try_from(req),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn response_renders_times_of_day() {
        let space = Space {
            space_id: SpaceId::new(),
            space_name: "Room".into(),
            description: String::new(),
            image_path: None,
            working_hours: WorkingHours::new(default_work_start(), default_work_end()).unwrap(),
        };
        let json = serde_json::to_value(SpaceResponse::from(space)).unwrap();
        assert_eq!(json["workStart"], "08:00:00");
        assert_eq!(json["workEnd"], "20:00:00");
    }
}
