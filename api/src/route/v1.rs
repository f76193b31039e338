use axum::Router;
use registry::AppRegistry;

use super::{
    booking::build_booking_routers, space::build_space_routers, user::build_user_routers,
};

pub fn build_v1_routers() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_space_routers())
        .merge(build_booking_routers())
        .merge(build_user_routers());

    Router::new().nest("/api/v1", router)
}
