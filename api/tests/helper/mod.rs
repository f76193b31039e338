#![allow(dead_code)]

use api::route::{
    auth::build_auth_routers, health::build_health_check_routers, v1::build_v1_routers,
};
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use kernel::model::{
    booking::Booking,
    id::{BookingId, SpaceId, UserId},
    role::Role,
    user::User,
};
use kernel::repository::{auth::MockAuthRepository, user::MockUserRepository};
use registry::AppRegistry;

pub const TEST_TOKEN: &str = "test-access-token";

pub fn make_router(registry: AppRegistry) -> Router {
    Router::new()
        .merge(build_health_check_routers())
        .merge(build_auth_routers())
        .merge(build_v1_routers())
        .with_state(registry)
}

pub fn fake_user(role: Role) -> User {
    User {
        user_id: UserId::new(),
        user_name: "Test User".into(),
        email: "test@example.com".into(),
        role,
    }
}

/// Repositories that resolve `TEST_TOKEN` to `user`.
pub fn signed_in(user: &User) -> (MockAuthRepository, MockUserRepository) {
    let user_id = user.user_id;
    let mut auth = MockAuthRepository::new();
    auth.expect_fetch_user_id_from_token()
        .returning(move |_| Ok(Some(user_id)));

    let current = user.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_current_user()
        .returning(move |_| Ok(Some(current.clone())));

    (auth, users)
}

pub fn fake_booking(user_id: UserId, space_id: SpaceId, start_time: DateTime<Utc>) -> Booking {
    Booking {
        booking_id: BookingId::new(),
        user_id,
        space_id,
        start_time,
        duration_minutes: 60,
        end_time: start_time + Duration::minutes(60),
        description: "planning".into(),
    }
}

pub fn request(method: Method, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn anonymous_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(res: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
