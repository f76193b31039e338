use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{create_booking, delete_booking, show_my_bookings, update_booking};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(create_booking))
        .route("/my", get(show_my_bookings))
        .route("/:booking_id", put(update_booking).delete(delete_booking));

    Router::new().nest("/bookings", booking_routers)
}
