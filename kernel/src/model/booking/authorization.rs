use shared::error::{AppError, AppResult};

use crate::model::id::UserId;

use super::Booking;

/// Only the identity that created a booking may change or delete it.
pub fn ensure_owner(booking: &Booking, user_id: UserId) -> AppResult<()> {
    if booking.user_id == user_id {
        Ok(())
    } else {
        Err(AppError::ForbiddenOperation)
    }
}
