//! Vehicle DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{NewVehicle, VehicleChanges, VehicleView};
use crate::domain::FuelType;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddVehicleRequest {
    #[validate(length(min = 1, max = 50, message = "make is required"))]
    pub make: String,
    #[validate(length(min = 1, max = 50, message = "model is required"))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "year must be 1900-2100"))]
    pub year: i32,
    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage: i32,
    pub fuel_type_id: i64,
    #[validate(range(min = 1, message = "horsepower must be positive"))]
    pub horsepower: i32,
    #[validate(length(min = 1, max = 50, message = "capacity is required"))]
    pub capacity: String,
    #[validate(range(min = 1, message = "daily rate must be positive"))]
    pub daily_rate: i64,
}

impl From<AddVehicleRequest> for NewVehicle {
    fn from(r: AddVehicleRequest) -> Self {
        Self {
            make: r.make,
            model: r.model,
            year: r.year,
            mileage: r.mileage,
            fuel_type_id: r.fuel_type_id,
            horsepower: r.horsepower,
            capacity: r.capacity,
            daily_rate: r.daily_rate,
        }
    }
}

/// Partial vehicle update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct EditVehicleRequest {
    #[validate(length(min = 1, max = 50, message = "make must not be empty"))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50, message = "model must not be empty"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "year must be 1900-2100"))]
    pub year: Option<i32>,
    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage: Option<i32>,
    pub fuel_type_id: Option<i64>,
    #[validate(range(min = 1, message = "horsepower must be positive"))]
    pub horsepower: Option<i32>,
    #[validate(length(min = 1, max = 50, message = "capacity must not be empty"))]
    pub capacity: Option<String>,
    #[validate(range(min = 1, message = "daily rate must be positive"))]
    pub daily_rate: Option<i64>,
}

impl From<EditVehicleRequest> for VehicleChanges {
    fn from(r: EditVehicleRequest) -> Self {
        Self {
            make: r.make,
            model: r.model,
            year: r.year,
            mileage: r.mileage,
            fuel_type_id: r.fuel_type_id,
            horsepower: r.horsepower,
            capacity: r.capacity,
            daily_rate: r.daily_rate,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VehicleDto {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type_id: i64,
    pub fuel_type: String,
    pub horsepower: i32,
    pub capacity: String,
    pub daily_rate: i64,
    pub available: bool,
    pub image_id: i64,
}

impl From<VehicleView> for VehicleDto {
    fn from(view: VehicleView) -> Self {
        let v = view.vehicle;
        Self {
            id: v.id,
            make: view.make_name,
            model: view.model_name,
            year: v.year,
            mileage: v.mileage,
            fuel_type_id: v.fuel_type.id(),
            fuel_type: v.fuel_type.as_str().to_string(),
            horsepower: v.horsepower,
            capacity: v.capacity,
            daily_rate: v.daily_rate,
            available: v.available,
            image_id: v.image_id,
        }
    }
}

/// Fuel type reference entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FuelTypeDto {
    pub id: i64,
    pub name: String,
}

impl From<FuelType> for FuelTypeDto {
    fn from(ft: FuelType) -> Self {
        Self {
            id: ft.id(),
            name: ft.as_str().to_string(),
        }
    }
}
