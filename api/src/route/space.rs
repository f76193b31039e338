use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::space::{
    delete_space, register_space, show_space, show_space_bookings, show_space_list, update_space,
};

pub fn build_space_routers() -> Router<AppRegistry> {
    let spaces_routers = Router::new()
        .route("/", get(show_space_list).post(register_space))
        .route(
            "/:space_id",
            get(show_space).put(update_space).delete(delete_space),
        )
        .route("/:space_id/bookings", get(show_space_bookings));

    Router::new().nest("/spaces", spaces_routers)
}
