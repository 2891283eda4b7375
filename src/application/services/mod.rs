pub mod fleet;
pub mod rental;

pub use fleet::{FleetService, NewVehicle, VehicleChanges, VehicleView};
pub use rental::RentalService;
