use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking, Requester,
    },
    id::{BookingId, SpaceId, UserId},
};
use serde::{Deserialize, Serialize};
use shared::error::AppError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub space_id: SpaceId,
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub duration_minutes: i32,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
}

// The owner always comes from the authenticated caller, never from the body.
#[derive(new)]
pub struct CreateBookingRequestWithRequester(Requester, CreateBookingRequest);

impl From<CreateBookingRequestWithRequester> for CreateBooking {
    fn from(value: CreateBookingRequestWithRequester) -> Self {
        let CreateBookingRequestWithRequester(
            requested_by,
            CreateBookingRequest {
                space_id,
                start_time,
                duration_minutes,
                description,
            },
        ) = value;
        CreateBooking {
            space_id,
            requested_by,
            start_time,
            duration_minutes,
            description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    #[garde(skip)]
    pub start_time: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub duration_minutes: i32,
    #[garde(skip)]
    #[serde(default)]
    pub description: String,
}

#[derive(new)]
pub struct UpdateBookingRequestWithIds(BookingId, Requester, UpdateBookingRequest);

impl From<UpdateBookingRequestWithIds> for UpdateBooking {
    fn from(value: UpdateBookingRequestWithIds) -> Self {
        let UpdateBookingRequestWithIds(
            booking_id,
            requested_by,
            UpdateBookingRequest {
                start_time,
                duration_minutes,
                description,
            },
        ) = value;
        UpdateBooking {
            booking_id,
            requested_by,
            start_time,
            duration_minutes,
            description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingDateQuery {
    pub date: String,
}

impl BookingDateQuery {
    pub fn parse(&self) -> Result<NaiveDate, AppError> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub space_id: SpaceId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub end_time: DateTime<Utc>,
    pub description: String,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            user_id,
            space_id,
            start_time,
            duration_minutes,
            end_time,
            description,
        } = value;
        Self {
            booking_id,
            user_id,
            space_id,
            start_time,
            duration_minutes,
            end_time,
            description,
        }
    }
}
