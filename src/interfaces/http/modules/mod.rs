pub mod auth;
pub mod health;
pub mod rentals;
pub mod vehicles;
