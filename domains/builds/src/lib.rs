//! Builds domain: build jobs, stored resources, retrieval

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use api::{routes, BuildsState};
pub use domain::annotate::annotated_primary;
pub use domain::entities::*;
pub use repository::memory::MemoryBuildStore;
pub use repository::sqlite::SqliteBuildStore;
pub use repository::{BuildStore, StoreConfig, StoreFactory};
