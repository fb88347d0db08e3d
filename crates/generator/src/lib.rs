//! Scaffoldweb mesh generation boundary
//!
//! Provides the parametric mesh generator abstraction with support for:
//! - Typed per-generator option schemas with a single validating parse step
//! - An explicit generator registry built at startup and injected where
//!   needed (no module-level singleton)
//! - A built-in ellipsoid-shell generator for anatomical demo scaffolds
//! - A mock generator for testing

pub mod ellipsoid;
pub mod mock;
pub mod options;

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

pub use ellipsoid::EllipsoidShellGenerator;
pub use options::{merge_options, MeshOptions, OptionKind, OptionSchema, OptionValue};

/// One exported graphics resource, opaque to everything downstream.
pub type Blob = Vec<u8>;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Option '{name}' expects {expected}, got '{value}'")]
    TypeMismatch {
        name: String,
        expected: OptionKind,
        value: String,
    },

    #[error("Invalid value for option '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

/// A parametric mesh generator.
///
/// Implementations produce an ordered sequence of serialized graphics
/// resources for one build: the first blob is the export metadata (a JSON
/// array with one entry per graphics object), the remaining blobs carry the
/// corresponding payloads in the same order. Callers rely on that ordering.
pub trait MeshGenerator: Send + Sync {
    /// The full option set with default values.
    fn default_options(&self) -> MeshOptions;

    /// Declared option types, used to parse raw request parameters.
    ///
    /// Defaults to the kinds of `default_options`, which is correct for any
    /// generator whose defaults cover every supported option.
    fn schema(&self) -> OptionSchema {
        OptionSchema::from_defaults(&self.default_options())
    }

    /// Generate the mesh and export it as an ordered blob sequence.
    ///
    /// `options` is the fully merged option set (request values over
    /// defaults). This is CPU-bound work; callers on an async runtime should
    /// run it on a blocking thread.
    fn generate(&self, options: &MeshOptions) -> Result<Vec<Blob>, GeneratorError>;
}

/// Capability table mapping mesh-type keys to generators.
///
/// Constructed once at startup by the composition root and handed to the
/// HTTP layer as shared state.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, Arc<dyn MeshGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under a mesh-type key, replacing any previous
    /// entry for that key.
    pub fn register(&mut self, mesh_type: impl Into<String>, generator: Arc<dyn MeshGenerator>) {
        let mesh_type = mesh_type.into();
        tracing::debug!(%mesh_type, "Registering mesh generator");
        self.generators.insert(mesh_type, generator);
    }

    /// Look up the generator for a mesh-type key.
    pub fn get(&self, mesh_type: &str) -> Option<Arc<dyn MeshGenerator>> {
        self.generators.get(mesh_type).cloned()
    }

    /// Registered mesh-type keys, in sorted order.
    pub fn mesh_types(&self) -> Vec<&str> {
        self.generators.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}
