//! # HTTP Server Module
//!
//! Axum server exposing the customer API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/customers` - Create and list customers
//! - `/api/customers/:customer_id` - Read, replace and delete one customer

pub mod config;
pub mod customer_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::{shutdown_signal, HttpServer};
