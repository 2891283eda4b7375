//! Vehicle API handlers
//!
//! Fleet mutations are admin-only; the availability listing is public.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;

use super::dto::{AddVehicleRequest, EditVehicleRequest, FuelTypeDto, VehicleDto};
use crate::application::FleetService;
use crate::domain::FuelType;
use crate::interfaces::http::common::{domain_error, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Vehicle handler state
#[derive(Clone)]
pub struct VehicleHandlerState {
    pub fleet: FleetService,
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
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All vehicles in the fleet", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_vehicles(
    State(state): State<VehicleHandlerState>,
) -> Json<ApiResponse<Vec<VehicleDto>>> {
    let vehicles = state
        .fleet
        .list_vehicles()
        .await
        .into_iter()
        .map(VehicleDto::from)
        .collect();
    Json(ApiResponse::success(vehicles))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/available",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Vehicles currently offered for rent", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_available_vehicles(
    State(state): State<VehicleHandlerState>,
) -> Json<ApiResponse<Vec<VehicleDto>>> {
    let vehicles = state
        .fleet
        .list_available()
        .await
        .into_iter()
        .map(VehicleDto::from)
        .collect();
    Json(ApiResponse::success(vehicles))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/fuel-types",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Fuel type reference table", body = ApiResponse<Vec<FuelTypeDto>>)
    )
)]
pub async fn list_fuel_types() -> Json<ApiResponse<Vec<FuelTypeDto>>> {
    let types = FuelType::all().into_iter().map(FuelTypeDto::from).collect();
    Json(ApiResponse::success(types))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle details", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<VehicleHandlerState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<VehicleDto>>)> {
    let view = state.fleet.get_vehicle(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(VehicleDto::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = AddVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Unknown fuel type")
    )
)]
pub async fn add_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<AddVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleDto>>), (StatusCode, Json<ApiResponse<VehicleDto>>)>
{
    require_admin(&user)?;
    let vehicle = state
        .fleet
        .add_vehicle(request.into())
        .await
        .map_err(domain_error)?;
    let view = state
        .fleet
        .get_vehicle(vehicle.id)
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VehicleDto::from(view))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    request_body = EditVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = ApiResponse<VehicleDto>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle or fuel type not found")
    )
)]
pub async fn edit_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<EditVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<VehicleDto>>)> {
    require_admin(&user)?;
    let vehicle = state
        .fleet
        .edit_vehicle(id, request.into())
        .await
        .map_err(domain_error)?;
    let view = state
        .fleet
        .get_vehicle(vehicle.id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(VehicleDto::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/availability",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "New availability flag", body = ApiResponse<bool>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Accepted rental in progress today")
    )
)]
pub async fn toggle_availability(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<bool>>)> {
    require_admin(&user)?;
    let today = Utc::now().date_naive();
    let available = state
        .fleet
        .toggle_availability(id, today)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(available)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Vehicle deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found"),
        (status = 409, description = "Rentals still reference the vehicle")
    )
)]
pub async fn delete_vehicle(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EmptyData>>, (StatusCode, Json<ApiResponse<EmptyData>>)> {
    require_admin(&user)?;
    state.fleet.delete_vehicle(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/image",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "New image id", body = ApiResponse<i64>),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn upload_vehicle_image(
    State(state): State<VehicleHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<ApiResponse<i64>>, (StatusCode, Json<ApiResponse<i64>>)> {
    require_admin(&user)?;
    if body.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Image body must not be empty")),
        ));
    }
    let image_id = state
        .fleet
        .change_image(id, body.to_vec())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(image_id)))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}/image",
    tag = "Vehicles",
    params(("id" = i64, Path, description = "Vehicle id")),
    responses(
        (status = 200, description = "Image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "Vehicle or image not found")
    )
)]
pub async fn get_vehicle_image(
    State(state): State<VehicleHandlerState>,
    Path(id): Path<i64>,
) -> Result<Response, (StatusCode, Json<ApiResponse<EmptyData>>)> {
    let bytes = state.fleet.vehicle_image(id).await.map_err(domain_error)?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    )
        .into_response())
}
