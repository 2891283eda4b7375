//! # Car Rental Service
//!
//! Fleet management and rental booking backend.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities (vehicles, rentals, users)
//! - **application**: Business logic services over the aggregate store
//! - **infrastructure**: Storage, image blobs, JWT and password hashing
//! - **interfaces**: REST API with OpenAPI documentation
//! - **shared**: Error taxonomy used across layers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
