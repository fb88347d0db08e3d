//! Common test utilities and fixtures for integration tests
//!
//! Spawns the application in-process on an ephemeral port so the suite is
//! fully self-contained, and provides a thin HTTP client around it.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use serde_json::Value;

use scaffoldweb_builds::{BuildsState, MemoryBuildStore, StoreConfig};
use scaffoldweb_generator::GeneratorRegistry;

/// A running test application plus an HTTP client pointed at it.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the full application (default generator registry, fresh
    /// in-memory store).
    pub async fn spawn() -> Result<Self> {
        let store_config = StoreConfig {
            backend: "memory".to_string(),
            database_url: String::new(),
        };
        let app = scaffoldweb_app::create_app(store_config).await?;
        Self::serve(app).await
    }

    /// Spawn an application around a caller-supplied generator registry and
    /// a fresh in-memory store. Used to script exact generator output.
    pub async fn spawn_with_registry(registry: GeneratorRegistry) -> Result<Self> {
        let state = BuildsState {
            store: Arc::new(MemoryBuildStore::new()),
            generators: Arc::new(registry),
        };
        let app = Router::new().merge(scaffoldweb_builds::routes().with_state(state));
        Self::serve(app).await
    }

    async fn serve(app: Router) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server stopped unexpectedly");
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
        })
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?)
    }

    /// GET a path with query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?)
    }

    /// GET a path and decode the JSON body, returning it with the status.
    pub async fn get_json(&self, path: &str) -> Result<(reqwest::StatusCode, Value)> {
        let response = self.get(path).await?;
        let status = response.status();
        let body = response.json().await?;
        Ok((status, body))
    }
}

/// The error code the API reported, for assertion convenience.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

/// Parse the resource id out of an annotated `/output/{id}` URL.
pub fn output_id(url: &str) -> i64 {
    url.strip_prefix("/output/")
        .and_then(|id| id.parse().ok())
        .unwrap_or_else(|| panic!("not an output URL: {url}"))
}
