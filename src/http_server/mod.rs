//! # HTTP Server Module
//!
//! Axum front end for the user directory.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness text
//! - `GET /health` - Status and active backend
//! - `GET|POST /api/users` - List and create
//! - `GET /api/users/reset-db` - Clear the volatile store
//! - `GET|PUT|DELETE /api/users/:id` - Read, update and delete one user

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use routes::{health_routes, user_routes, UserState};
pub use server::HttpServer;
