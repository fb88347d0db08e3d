//! Scaffoldweb application composition root
//!
//! Composes the generator capability table, the build store, and the domain
//! router into a single application.

use std::sync::Arc;

use axum::{response::Html, Router};

use scaffoldweb_builds::{BuildsState, StoreConfig, StoreFactory};
use scaffoldweb_generator::{EllipsoidShellGenerator, GeneratorRegistry};

/// Build the generator capability table.
///
/// Every supported mesh type is registered here, at startup; nothing else in
/// the application may extend the table.
pub fn default_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry.register(
        "sphere_shell_1",
        Arc::new(EllipsoidShellGenerator::sphere()),
    );
    registry.register(
        "heart_ventricles_1",
        Arc::new(EllipsoidShellGenerator::ventricle()),
    );
    registry
}

/// Create the main application router with all routes and middleware
pub async fn create_app(store_config: StoreConfig) -> Result<Router, anyhow::Error> {
    let store = StoreFactory::create(&store_config).await?;

    let registry = default_registry();
    tracing::info!(mesh_types = ?registry.mesh_types(), "Registered mesh generators");

    let state = BuildsState {
        store,
        generators: Arc::new(registry),
    };

    // Compose domain routes with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(landing))
        .merge(scaffoldweb_builds::routes().with_state(state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Static landing content
async fn landing() -> Html<&'static str> {
    Html(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Scaffoldweb</title></head>\n\
         <body>\n\
         <h1>Scaffoldweb</h1>\n\
         <p>Anatomical scaffold generation service.</p>\n\
         <p>Try <code>/generator?meshtype=heart_ventricles_1</code>, then fetch\n\
         the linked <code>/output/{id}</code> resources.</p>\n\
         </body>\n\
         </html>\n",
    )
}
