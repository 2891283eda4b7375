//! Aggregate storage
//!
//! - `memory`: the fleet aggregate store (vehicles, makes, models, rentals,
//!   users) behind a single lock giving serializable critical sections
//! - `images`: binary image blob storage with the reserved default image

pub mod images;
pub mod memory;

pub use images::ImageStore;
pub use memory::{FleetStore, Tables};
