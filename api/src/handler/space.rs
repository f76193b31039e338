use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::{
    id::SpaceId,
    space::event::{CreateSpace, DeleteSpace},
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::{AppJson, AppPath, AppQuery, AuthorizedUser},
    model::{
        booking::{BookingDateQuery, BookingsResponse},
        space::{
            CreateSpaceRequest, SpaceResponse, SpacesResponse, UpdateSpaceRequest,
            UpdateSpaceRequestWithIds,
        },
    },
};

pub async fn register_space(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<CreateSpaceRequest>,
) -> AppResult<(StatusCode, Json<SpaceResponse>)> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let space_id = registry
        .space_repository()
        .create(CreateSpace::try_from(req)?)
        .await?;

    registry
        .space_repository()
        .find_by_id(space_id)
        .await?
        .map(|space| (StatusCode::CREATED, Json(space.into())))
        .ok_or_else(|| AppError::EntityNotFound(format!("space ({space_id}) not found")))
}

pub async fn show_space_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SpacesResponse>> {
    registry
        .space_repository()
        .find_all()
        .await
        .map(SpacesResponse::from)
        .map(Json)
}

pub async fn show_space(
    AppPath(space_id): AppPath<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SpaceResponse>> {
    registry
        .space_repository()
        .find_by_id(space_id)
        .await
        .and_then(|space| match space {
            Some(space) => Ok(Json(space.into())),
            None => Err(AppError::EntityNotFound(format!(
                "space ({space_id}) not found"
            ))),
        })
}

pub async fn update_space(
    user: AuthorizedUser,
    AppPath(space_id): AppPath<SpaceId>,
    State(registry): State<AppRegistry>,
    AppJson(req): AppJson<UpdateSpaceRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .space_repository()
        .update(UpdateSpaceRequestWithIds::new(space_id, req).into())
        .await
        .map(|_| StatusCode::OK)
}

pub async fn delete_space(
    user: AuthorizedUser,
    AppPath(space_id): AppPath<SpaceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .space_repository()
        .delete(DeleteSpace { space_id })
        .await
        .map(|_| StatusCode::OK)
}

pub async fn show_space_bookings(
    AppPath(space_id): AppPath<SpaceId>,
    AppQuery(query): AppQuery<BookingDateQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingsResponse>> {
    let date = query.parse()?;

    registry
        .booking_repository()
        .find_by_space_on_date(space_id, date)
        .await
        .map(BookingsResponse::from)
        .map(Json)
}
