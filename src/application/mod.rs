//! Application services coordinating domain entities and storage

pub mod services;

pub use services::{FleetService, NewVehicle, RentalService, VehicleChanges, VehicleView};
