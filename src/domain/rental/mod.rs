pub mod model;
pub mod pricing;

pub use model::{Rental, RentalStatus, StatusHistoryEntry};
pub use pricing::rental_price;
