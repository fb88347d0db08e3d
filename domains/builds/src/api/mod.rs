//! API layer for the Builds domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::BuildsState;
pub use routes::routes;
