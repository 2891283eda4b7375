//! API router with OpenAPI documentation

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::application::{FleetService, RentalService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::storage::{FleetStore, ImageStore};
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};

use super::modules::{auth, health, rentals, vehicles};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::get_current_user,
        // Vehicles
        vehicles::handlers::list_vehicles,
        vehicles::handlers::list_available_vehicles,
        vehicles::handlers::list_fuel_types,
        vehicles::handlers::get_vehicle,
        vehicles::handlers::add_vehicle,
        vehicles::handlers::edit_vehicle,
        vehicles::handlers::toggle_availability,
        vehicles::handlers::delete_vehicle,
        vehicles::handlers::upload_vehicle_image,
        vehicles::handlers::get_vehicle_image,
        // Rentals
        rentals::handlers::create_rental,
        rentals::handlers::list_rentals,
        rentals::handlers::list_rentals_for_user,
        rentals::handlers::get_rental,
        rentals::handlers::get_rental_history,
        rentals::handlers::change_rental_status,
        rentals::handlers::edit_rental_dates,
        rentals::handlers::delete_rental,
        rentals::handlers::list_rental_statuses,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            // Vehicles
            vehicles::VehicleDto,
            vehicles::AddVehicleRequest,
            vehicles::EditVehicleRequest,
            vehicles::FuelTypeDto,
            // Rentals
            rentals::RentalDto,
            rentals::CreateRentalRequest,
            rentals::EditRentalDatesRequest,
            rentals::ChangeStatusRequest,
            rentals::StatusHistoryDto,
            rentals::RentalStatusDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), registration"),
        (name = "Vehicles", description = "Fleet management: vehicles, availability, images"),
        (name = "Rentals", description = "Rental bookings, status lifecycle and history"),
    ),
    info(
        title = "Car Rental Service API",
        version = "1.0.0",
        description = "REST API for fleet management and rental bookings",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    store: Arc<FleetStore>,
    images: Arc<ImageStore>,
    jwt_config: JwtConfig,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let fleet = FleetService::new(store.clone(), images);
    let rental_service = RentalService::new(store.clone());

    let auth_state = auth::AuthHandlerState {
        store: store.clone(),
        jwt_config,
    };
    let vehicle_state = vehicles::VehicleHandlerState { fleet };
    let rental_state = rentals::RentalHandlerState {
        rentals: rental_service,
    };
    let health_state = health::handlers::HealthState {
        store,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .route("/register", post(auth::handlers::register))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Vehicle routes (public): browsing the offer needs no account
    let vehicle_public_routes = Router::new()
        .route("/available", get(vehicles::handlers::list_available_vehicles))
        .route("/fuel-types", get(vehicles::handlers::list_fuel_types))
        .with_state(vehicle_state.clone());

    // Vehicle routes (protected)
    let vehicle_routes = Router::new()
        .route(
            "/",
            get(vehicles::handlers::list_vehicles).post(vehicles::handlers::add_vehicle),
        )
        .route(
            "/{id}",
            get(vehicles::handlers::get_vehicle)
                .put(vehicles::handlers::edit_vehicle)
                .delete(vehicles::handlers::delete_vehicle),
        )
        .route(
            "/{id}/availability",
            post(vehicles::handlers::toggle_availability),
        )
        .route(
            "/{id}/image",
            get(vehicles::handlers::get_vehicle_image)
                .post(vehicles::handlers::upload_vehicle_image),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(vehicle_state);

    // Rental routes (protected)
    let rental_routes = Router::new()
        .route(
            "/",
            get(rentals::handlers::list_rentals).post(rentals::handlers::create_rental),
        )
        .route("/user/{user_id}", get(rentals::handlers::list_rentals_for_user))
        .route(
            "/{id}",
            get(rentals::handlers::get_rental).delete(rentals::handlers::delete_rental),
        )
        .route("/{id}/history", get(rentals::handlers::get_rental_history))
        .route("/{id}/status", post(rentals::handlers::change_rental_status))
        .route("/{id}/dates", put(rentals::handlers::edit_rental_dates))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(rental_state);

    // Build router
    Router::new()
        // OpenAPI document
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        // Health
        .route("/health", get(health::handlers::health_check))
        .with_state(health_state)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Vehicles
        .nest("/api/v1/vehicles", vehicle_public_routes)
        .nest("/api/v1/vehicles", vehicle_routes)
        // Rentals
        .nest("/api/v1/rentals", rental_routes)
        // Status reference table (public)
        .route(
            "/api/v1/rental-statuses",
            get(rentals::handlers::list_rental_statuses),
        )
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
