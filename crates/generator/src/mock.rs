//! Mock mesh generator implementation
//!
//! Returns a configured blob sequence and records the options of every
//! call for test assertions. Thread-safe via `Arc<Mutex<>>`.

use std::sync::{Arc, Mutex};

use crate::options::MeshOptions;
use crate::{Blob, GeneratorError, MeshGenerator};

/// Mock generator that returns fixed blobs and records calls.
#[derive(Debug, Clone)]
pub struct MockMeshGenerator {
    blobs: Vec<Blob>,
    defaults: MeshOptions,
    fail: bool,
    calls: Arc<Mutex<Vec<MeshOptions>>>,
}

impl MockMeshGenerator {
    /// Create a mock that returns the given blobs on every call.
    pub fn new(blobs: Vec<Blob>) -> Self {
        Self {
            blobs,
            defaults: MeshOptions::new(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the default options the mock reports.
    pub fn with_defaults(mut self, defaults: MeshOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Make every `generate` call fail, for error-path tests.
    pub fn failing() -> Self {
        let mut mock = Self::new(Vec::new());
        mock.fail = true;
        mock
    }

    /// Return the options of all recorded calls.
    pub fn recorded_calls(&self) -> Vec<MeshOptions> {
        self.calls
            .lock()
            .expect("calls lock poisoned by a prior panic")
            .clone()
    }
}

impl MeshGenerator for MockMeshGenerator {
    fn default_options(&self) -> MeshOptions {
        self.defaults.clone()
    }

    fn generate(&self, options: &MeshOptions) -> Result<Vec<Blob>, GeneratorError> {
        tracing::debug!(options = ?options, "Mock generator: recording call");
        self.calls
            .lock()
            .map_err(|e| GeneratorError::Generation(format!("calls lock poisoned: {e}")))?
            .push(options.clone());

        if self.fail {
            return Err(GeneratorError::Generation(
                "mock generator configured to fail".to_string(),
            ));
        }
        Ok(self.blobs.clone())
    }
}
