//! Build store: persistence and lookup for jobs and their resources

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use scaffoldweb_common::{Error, Result};

use crate::domain::entities::{Job, JobDraft, JobSummary};

/// Append-only persistence for build jobs and point lookup of resources.
///
/// Implementations assign each stored resource a globally unique id from a
/// single strictly increasing counter. Within one job the assigned ids are
/// consecutive and follow the draft's blob order, so callers may derive
/// follow-up ids by offset from the first. A job becomes visible atomically:
/// either every one of its resources is queryable, or none is.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Persist a draft, assigning resource ids. Returns the stored job with
    /// ids filled in. Accepts a draft with no blobs (the job is recorded,
    /// nothing else happens).
    async fn add_job(&self, draft: JobDraft) -> Result<Job>;

    /// The stored blob for a resource id, if that id has ever been
    /// assigned. Never returns another id's data.
    async fn find_resource(&self, id: i64) -> Result<Option<Vec<u8>>>;

    /// Job history in append order.
    async fn list_jobs(&self) -> Result<Vec<JobSummary>>;
}

/// Build store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store backend (memory, sqlite)
    pub backend: String,
    /// Database URL for the sqlite backend
    pub database_url: String,
}

impl StoreConfig {
    /// Create store config from environment variables.
    pub fn from_env() -> Self {
        let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".to_string());
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
        Self {
            backend,
            database_url,
        }
    }
}

/// Factory for creating BuildStore implementations.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a BuildStore based on configuration.
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn BuildStore>> {
        match config.backend.as_str() {
            "memory" => {
                tracing::info!("Creating in-memory build store");
                Ok(Arc::new(memory::MemoryBuildStore::new()))
            }
            "sqlite" => {
                tracing::info!(database_url = %config.database_url, "Creating sqlite build store");
                let store = sqlite::SqliteBuildStore::connect(&config.database_url).await?;
                Ok(Arc::new(store))
            }
            backend => Err(Error::Internal(format!(
                "Unknown store backend: {}. Supported backends: memory, sqlite",
                backend
            ))),
        }
    }
}
