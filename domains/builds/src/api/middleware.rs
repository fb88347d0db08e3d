//! Builds domain state

use std::sync::Arc;

use scaffoldweb_generator::GeneratorRegistry;

use crate::repository::BuildStore;

/// Application state for the Builds domain
#[derive(Clone)]
pub struct BuildsState {
    pub store: Arc<dyn BuildStore>,
    pub generators: Arc<GeneratorRegistry>,
}
