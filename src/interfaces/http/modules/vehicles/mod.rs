pub mod dto;
pub mod handlers;

pub use dto::{AddVehicleRequest, EditVehicleRequest, FuelTypeDto, VehicleDto};
pub use handlers::VehicleHandlerState;
