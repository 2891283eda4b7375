pub mod model;

pub use model::{FuelType, Make, Vehicle, VehicleModel, DEFAULT_IMAGE_ID};
