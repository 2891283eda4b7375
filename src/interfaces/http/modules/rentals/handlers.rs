//! Rental API handlers
//!
//! Renters book and read their own rentals; lifecycle management
//! (status transitions, rescheduling, deletion, the full listing) is
//! admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::dto::{
    ChangeStatusRequest, CreateRentalRequest, EditRentalDatesRequest, RentalDto, RentalStatusDto,
    StatusHistoryDto,
};
use crate::application::RentalService;
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Rental handler state
#[derive(Clone)]
pub struct RentalHandlerState {
    pub rentals: RentalService,
}

fn require_admin<T>(
    user: &AuthenticatedUser,
) -> Result<(), (StatusCode, Json<ApiResponse<T>>)> {
    if user.is_admin() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Insufficient permissions")),
        ))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/rentals",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    request_body = CreateRentalRequest,
    responses(
        (status = 201, description = "Rental created", body = ApiResponse<RentalDto>),
        (status = 403, description = "Booking for another user requires admin"),
        (status = 404, description = "Vehicle or user not found"),
        (status = 422, description = "End date before start date")
    )
)]
pub async fn create_rental(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RentalDto>>), (StatusCode, Json<ApiResponse<RentalDto>>)>
{
    let renter_id = request.user_id.unwrap_or(user.user_id);
    if renter_id != user.user_id {
        require_admin(&user)?;
    }

    let rental = state
        .rentals
        .create(
            request.vehicle_id,
            renter_id,
            request.start_date,
            request.end_date,
            Utc::now(),
        )
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RentalDto::from(&rental))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All rentals", body = ApiResponse<Vec<RentalDto>>),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_rentals(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<RentalDto>>>, (StatusCode, Json<ApiResponse<Vec<RentalDto>>>)> {
    require_admin(&user)?;
    let rentals = state
        .rentals
        .list_all()
        .await
        .iter()
        .map(RentalDto::from)
        .collect();
    Ok(Json(ApiResponse::success(rentals)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/user/{user_id}",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "Renter id")),
    responses(
        (status = 200, description = "Rentals of one renter", body = ApiResponse<Vec<RentalDto>>),
        (status = 403, description = "Reading another user's rentals requires admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_rentals_for_user(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<RentalDto>>>, (StatusCode, Json<ApiResponse<Vec<RentalDto>>>)> {
    if user_id != user.user_id {
        require_admin(&user)?;
    }
    let rentals = state
        .rentals
        .list_by_renter(user_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        rentals.iter().map(RentalDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Rental details", body = ApiResponse<RentalDto>),
        (status = 403, description = "Reading another user's rental requires admin"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<RentalDto>>, (StatusCode, Json<ApiResponse<RentalDto>>)> {
    let rental = state.rentals.get(id).await.map_err(domain_error)?;
    if rental.renter_id != user.user_id {
        require_admin(&user)?;
    }
    Ok(Json(ApiResponse::success(RentalDto::from(&rental))))
}

#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}/history",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Status history in recording order", body = ApiResponse<Vec<StatusHistoryDto>>),
        (status = 403, description = "Reading another user's rental requires admin"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental_history(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<
    Json<ApiResponse<Vec<StatusHistoryDto>>>,
    (StatusCode, Json<ApiResponse<Vec<StatusHistoryDto>>>),
> {
    let rental = state.rentals.history(id).await.map_err(domain_error)?;
    if rental.renter_id != user.user_id {
        require_admin(&user)?;
    }
    Ok(Json(ApiResponse::success(
        rental.history().iter().map(StatusHistoryDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/rentals/{id}/status",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental id")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Rental after the transition", body = ApiResponse<RentalDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rental or status not found")
    )
)]
pub async fn change_rental_status(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<ChangeStatusRequest>,
) -> Result<Json<ApiResponse<RentalDto>>, (StatusCode, Json<ApiResponse<RentalDto>>)> {
    require_admin(&user)?;
    let rental = state
        .rentals
        .change_status(id, request.status_id, Utc::now())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(RentalDto::from(&rental))))
}

#[utoipa::path(
    put,
    path = "/api/v1/rentals/{id}/dates",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental id")),
    request_body = EditRentalDatesRequest,
    responses(
        (status = 200, description = "Rental with the new range and price", body = ApiResponse<RentalDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rental not found"),
        (status = 422, description = "End date before start date")
    )
)]
pub async fn edit_rental_dates(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<EditRentalDatesRequest>,
) -> Result<Json<ApiResponse<RentalDto>>, (StatusCode, Json<ApiResponse<RentalDto>>)> {
    require_admin(&user)?;
    let rental = state
        .rentals
        .edit_dates(id, request.start_date, request.end_date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(RentalDto::from(&rental))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/rentals/{id}",
    tag = "Rentals",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Rental and its history deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn delete_rental(
    State(state): State<RentalHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, (StatusCode, Json<ApiResponse<EmptyData>>)> {
    require_admin(&user)?;
    state.rentals.delete(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/rental-statuses",
    tag = "Rentals",
    responses(
        (status = 200, description = "Rental status reference table", body = ApiResponse<Vec<RentalStatusDto>>)
    )
)]
pub async fn list_rental_statuses() -> Json<ApiResponse<Vec<RentalStatusDto>>> {
    let statuses = RentalService::statuses()
        .into_iter()
        .map(RentalStatusDto::from)
        .collect();
    Json(ApiResponse::success(statuses))
}
