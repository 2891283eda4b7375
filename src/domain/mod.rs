pub mod rental;
pub mod user;
pub mod vehicle;

// Re-export commonly used types
pub use rental::{rental_price, Rental, RentalStatus, StatusHistoryEntry};
pub use user::{User, UserRole};
pub use vehicle::{FuelType, Make, Vehicle, VehicleModel, DEFAULT_IMAGE_ID};

// Re-export DomainError from shared for convenience
pub use crate::shared::{DomainError, DomainResult};
