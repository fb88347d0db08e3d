//! Route definitions for the Builds domain API
//!
//! `/generator` and `/output/{id}` are the public surface the annotated
//! artifact URLs point at, so their paths are fixed.

use axum::{routing::get, Router};

use super::handlers::{generator, outputs};
use super::middleware::BuildsState;

/// Create all Builds domain API routes
pub fn routes() -> Router<BuildsState> {
    Router::new()
        .route("/generator", get(generator::generate_mesh))
        .route("/output/{id}", get(outputs::get_output))
        .route("/jobs", get(outputs::list_jobs))
}
