use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Reasons the booking admission engine refuses a request.
///
/// Variants are listed in the order the checks run; only the first failing
/// check is ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingRejection {
    #[error("booking cannot start in the past")]
    InvalidTime,
    #[error("{0}")]
    InvalidInput(String),
    #[error("time slot is already booked or closer than {gap_minutes} minutes to another booking")]
    Conflict { gap_minutes: i64 },
    #[error("booking must be within working hours: {work_start} - {work_end}")]
    OutsideWorkingHours { work_start: String, work_end: String },
    #[error("you cannot have more than {limit} active bookings for this space")]
    QuotaExceeded { limit: usize },
    #[error("booking duration cannot exceed {limit} minutes")]
    DurationTooLong { limit: i32 },
}

impl BookingRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            BookingRejection::InvalidTime => "invalid_time",
            BookingRejection::InvalidInput(_) => "invalid_input",
            BookingRejection::Conflict { .. } => "conflict",
            BookingRejection::OutsideWorkingHours { .. } => "outside_working_hours",
            BookingRejection::QuotaExceeded { .. } => "quota_exceeded",
            BookingRejection::DurationTooLong { .. } => "duration_too_long",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingRejection::InvalidTime | BookingRejection::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            BookingRejection::Conflict { .. } => StatusCode::CONFLICT,
            BookingRejection::OutsideWorkingHours { .. }
            | BookingRejection::QuotaExceeded { .. }
            | BookingRejection::DurationTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    BookingRejected(#[from] BookingRejection),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("transaction could not be executed")]
    TransactionError(#[source] sqlx::Error),
    #[error("an error occurred while running a database query")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("{0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("login failed")]
    UnauthenticatedError,
    #[error("authorization information is invalid")]
    UnauthorizedError,
    #[error("operation not permitted")]
    ForbiddenOperation,
    #[error("{0}")]
    ConversionEntityError(String),
}

impl AppError {
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::BookingRejected(r) => r.reason(),
            AppError::InvalidInput(_)
            | AppError::ValidationError(_)
            | AppError::ConvertToUuidError(_) => "invalid_input",
            AppError::EntityNotFound(_) => "not_found",
            AppError::UnauthenticatedError | AppError::UnauthorizedError => "unauthorized",
            AppError::ForbiddenOperation => "forbidden",
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ConversionEntityError(_) => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BookingRejected(r) => r.status_code(),
            AppError::InvalidInput(_)
            | AppError::ValidationError(_)
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthenticatedError | AppError::UnauthorizedError => {
                StatusCode::UNAUTHORIZED
            }
            AppError::ForbiddenOperation => StatusCode::FORBIDDEN,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::KeyValueStoreError(_)
            | AppError::BcryptError(_)
            | AppError::ConversionEntityError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Internal failures are logged in full but never described to the caller.
        let message = if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "Unexpected error happened"
            );
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "reason": self.reason(),
            "message": message,
        });
        (status_code, Json(body)).into_response()
    }
}

// Malformed bodies, paths and query strings are caller input errors, kept
// apart from the 422 used for policy rejections.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
