//! HTTP surface
//!
//! Serves the aggregated subscription on every path plus a health endpoint.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use server::{ApiServer, AppState};
