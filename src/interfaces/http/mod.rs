//! HTTP REST API interfaces
//!
//! - `common`: response envelope, validated JSON extractor, error mapping
//! - `middleware`: JWT authentication middleware
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with OpenAPI documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
