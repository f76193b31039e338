mod helper;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, Utc};
use helper::{body_json, fake_booking, fake_user, make_router, request, signed_in};
use kernel::model::{
    booking::retention::{RetentionPolicy, SweepReport},
    id::{BookingId, SpaceId},
    role::Role,
};
use kernel::repository::booking::MockBookingRepository;
use registry::AppRegistryBuilder;
use rstest::rstest;
use shared::error::{AppError, BookingRejection};
use tower::ServiceExt;

#[tokio::test]
async fn create_booking_takes_owner_from_token() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let space_id = SpaceId::new();
    let start = Utc::now() + Duration::days(1);
    let created = fake_booking(user.user_id, space_id, start);

    let caller = user.user_id;
    let returned = created.clone();
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_create()
        .withf(move |event| {
            event.requested_by.user_id == caller
                && !event.requested_by.is_privileged
                && event.duration_minutes == 60
        })
        .times(1)
        .returning(move |_| Ok(returned.clone()));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::POST,
            "/api/v1/bookings",
            Some(serde_json::json!({
                "spaceId": space_id.to_string(),
                "startTime": start.to_rfc3339(),
                "durationMinutes": 60,
                "description": "planning",
                "userId": "00000000-0000-0000-0000-000000000000",
            })),
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;
    assert_eq!(body["userId"], caller.to_string());
    assert_eq!(body["bookingId"], created.booking_id.to_string());
    assert_eq!(body["durationMinutes"], 60);
    Ok(())
}

#[rstest]
#[case(BookingRejection::InvalidTime, StatusCode::BAD_REQUEST, "invalid_time")]
#[case(BookingRejection::Conflict { gap_minutes: 15 }, StatusCode::CONFLICT, "conflict")]
#[case(
    BookingRejection::OutsideWorkingHours { work_start: "08:00:00".into(), work_end: "20:00:00".into() },
    StatusCode::UNPROCESSABLE_ENTITY,
    "outside_working_hours"
)]
#[case(BookingRejection::QuotaExceeded { limit: 2 }, StatusCode::UNPROCESSABLE_ENTITY, "quota_exceeded")]
#[case(BookingRejection::DurationTooLong { limit: 120 }, StatusCode::UNPROCESSABLE_ENTITY, "duration_too_long")]
#[tokio::test]
async fn create_booking_surfaces_rejection(
    #[case] rejection: BookingRejection,
    #[case] status: StatusCode,
    #[case] reason: &str,
) -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_create()
        .returning(move |_| Err(AppError::BookingRejected(rejection.clone())));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::POST,
            "/api/v1/bookings",
            Some(serde_json::json!({
                "spaceId": SpaceId::new().to_string(),
                "startTime": (Utc::now() + Duration::days(1)).to_rfc3339(),
                "durationMinutes": 30,
            })),
        ))
        .await?;

    assert_eq!(res.status(), status);
    assert_eq!(body_json(res).await["reason"], reason);
    Ok(())
}

#[tokio::test]
async fn create_booking_rejects_non_positive_duration() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);

    let mut bookings = MockBookingRepository::new();
    bookings.expect_create().never();

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::POST,
            "/api/v1/bookings",
            Some(serde_json::json!({
                "spaceId": SpaceId::new().to_string(),
                "startTime": (Utc::now() + Duration::days(1)).to_rfc3339(),
                "durationMinutes": 0,
            })),
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn my_bookings_require_token() -> anyhow::Result<()> {
    let registry = AppRegistryBuilder::default().build();

    let res = make_router(registry)
        .oneshot(helper::anonymous_request(Method::GET, "/api/v1/bookings/my"))
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn delete_by_non_owner_is_forbidden() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let someone_else = fake_user(Role::User);
    let booking = fake_booking(
        someone_else.user_id,
        SpaceId::new(),
        Utc::now() + Duration::days(1),
    );
    let booking_id = booking.booking_id;

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(booking.clone())));
    bookings.expect_delete().never();

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/bookings/{booking_id}"),
            None,
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res).await["reason"], "forbidden");
    Ok(())
}

#[tokio::test]
async fn delete_by_owner_succeeds() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let booking = fake_booking(user.user_id, SpaceId::new(), Utc::now() + Duration::days(1));
    let booking_id = booking.booking_id;
    let owner = user.user_id;

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(booking.clone())));
    bookings
        .expect_delete()
        .withf(move |event| event.booking_id == booking_id && event.requested_by == owner)
        .times(1)
        .returning(|_| Ok(()));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/bookings/{booking_id}"),
            None,
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn delete_unknown_booking_is_not_found() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);

    let mut bookings = MockBookingRepository::new();
    bookings.expect_find_by_id().returning(|_| Ok(None));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/bookings/{}", BookingId::new()),
            None,
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn my_bookings_are_listed_for_caller() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let caller = user.user_id;
    let start = Utc::now() + Duration::days(1);
    let mine = vec![
        fake_booking(caller, SpaceId::new(), start),
        fake_booking(caller, SpaceId::new(), start + Duration::hours(3)),
    ];

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_by_user_id()
        .withf(move |user_id| *user_id == caller)
        .returning(move |_| Ok(mine.clone()));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(Method::GET, "/api/v1/bookings/my", None))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn create_booking_with_unparseable_time_is_bad_request() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);

    let mut bookings = MockBookingRepository::new();
    bookings.expect_create().never();

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::POST,
            "/api/v1/bookings",
            Some(serde_json::json!({
                "spaceId": SpaceId::new().to_string(),
                "startTime": "tomorrow",
                "durationMinutes": 60,
            })),
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["reason"], "invalid_input");
    Ok(())
}

#[tokio::test]
async fn malformed_booking_id_is_bad_request() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);

    let mut bookings = MockBookingRepository::new();
    bookings.expect_find_by_id().never();
    bookings.expect_delete().never();

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(Method::DELETE, "/api/v1/bookings/not-a-uuid", None))
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["reason"], "invalid_input");
    Ok(())
}

#[tokio::test]
async fn update_by_owner_reschedules() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let owner = user.user_id;
    let booking = fake_booking(owner, SpaceId::new(), Utc::now() + Duration::days(1));
    let booking_id = booking.booking_id;
    let new_start = booking.start_time + Duration::hours(2);
    let new_end = new_start + Duration::minutes(90);

    let found = booking.clone();
    let mut rescheduled = booking;
    rescheduled.start_time = new_start;
    rescheduled.duration_minutes = 90;
    rescheduled.end_time = new_end;
    rescheduled.description = "moved".into();

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    bookings
        .expect_update()
        .withf(move |event| {
            event.booking_id == booking_id
                && event.requested_by.user_id == owner
                && event.start_time == new_start
                && event.duration_minutes == 90
        })
        .times(1)
        .returning(move |_| Ok(rescheduled.clone()));

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/bookings/{booking_id}"),
            Some(serde_json::json!({
                "startTime": new_start.to_rfc3339(),
                "durationMinutes": 90,
                "description": "moved",
            })),
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["bookingId"], booking_id.to_string());
    let end_time: DateTime<Utc> = serde_json::from_value(body["endTime"].clone())?;
    assert_eq!(end_time, new_end);
    Ok(())
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let someone_else = fake_user(Role::User);
    let booking = fake_booking(
        someone_else.user_id,
        SpaceId::new(),
        Utc::now() + Duration::days(1),
    );
    let booking_id = booking.booking_id;
    let new_start = booking.start_time + Duration::hours(1);

    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_find_by_id()
        .returning(move |_| Ok(Some(booking.clone())));
    bookings.expect_update().never();

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/bookings/{booking_id}"),
            Some(serde_json::json!({
                "startTime": new_start.to_rfc3339(),
                "durationMinutes": 30,
            })),
        ))
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(res).await["reason"], "forbidden");
    Ok(())
}

#[tokio::test]
async fn create_booking_triggers_sweep_when_enabled() -> anyhow::Result<()> {
    let user = fake_user(Role::User);
    let (auth, users) = signed_in(&user);
    let space_id = SpaceId::new();
    let start = Utc::now() + Duration::days(1);
    let created = fake_booking(user.user_id, space_id, start);

    let (swept_tx, mut swept_rx) = tokio::sync::mpsc::unbounded_channel();
    let mut bookings = MockBookingRepository::new();
    bookings
        .expect_create()
        .times(1)
        .returning(move |_| Ok(created.clone()));
    bookings
        .expect_sweep_expired()
        .withf(|_, dry_run| !*dry_run)
        .times(1)
        .returning(move |cutoff, _| {
            let _ = swept_tx.send(cutoff);
            Ok(SweepReport {
                cutoff,
                dry_run: false,
                matched: 0,
                deleted: 0,
                sample: vec![],
            })
        });

    let registry = AppRegistryBuilder::default()
        .auth(auth)
        .user(users)
        .booking(bookings)
        .retention_policy(RetentionPolicy {
            window: Duration::days(1),
            sweep_after_create: true,
        })
        .build();

    let res = make_router(registry)
        .oneshot(request(
            Method::POST,
            "/api/v1/bookings",
            Some(serde_json::json!({
                "spaceId": space_id.to_string(),
                "startTime": start.to_rfc3339(),
                "durationMinutes": 60,
            })),
        ))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let cutoff = tokio::time::timeout(std::time::Duration::from_secs(5), swept_rx.recv())
        .await?
        .expect("sweep was not run");
    assert!(cutoff < Utc::now() - Duration::hours(23));
    Ok(())
}
