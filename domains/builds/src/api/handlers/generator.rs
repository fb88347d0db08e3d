//! Mesh build API handler

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::Value;

use scaffoldweb_common::{Error, Result};
use scaffoldweb_generator::{merge_options, GeneratorError};

use crate::api::middleware::BuildsState;
use crate::domain::annotate::annotated_primary;
use crate::domain::entities::JobDraft;

/// Query parameter naming the mesh type; every other parameter is a
/// generator option.
const MESH_TYPE_PARAM: &str = "meshtype";

/// Run one build: parse typed options, generate, store, annotate.
///
/// Responds with the annotated primary artifact. The generator runs before
/// the store is touched, so an abandoned or failed build persists nothing.
pub async fn generate_mesh(
    State(state): State<BuildsState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>> {
    let mesh_type = params
        .remove(MESH_TYPE_PARAM)
        .ok_or_else(|| Error::Validation("missing 'meshtype' query parameter".to_string()))?;

    let generator = state
        .generators
        .get(&mesh_type)
        .ok_or_else(|| Error::UnknownMeshType(mesh_type.clone()))?;

    let supplied = generator
        .schema()
        .parse(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .map_err(generator_error)?;
    let options = merge_options(generator.default_options(), supplied);

    // CPU-bound mesh generation; keep it off the async workers and strictly
    // before the store's critical section.
    let blobs = tokio::task::spawn_blocking(move || generator.generate(&options))
        .await
        .map_err(|e| Error::Internal(format!("generator task panicked: {e}")))?
        .map_err(generator_error)?;

    let job = state.store.add_job(JobDraft::new(blobs)).await?;
    tracing::info!(
        job_id = %job.id,
        %mesh_type,
        resources = job.resources.len(),
        "Stored build job"
    );

    let response = annotated_primary(&job)?;
    Ok(Json(response))
}

/// Map generator failures onto the common error type: option problems are
/// client errors, generation/export problems are ours.
fn generator_error(err: GeneratorError) -> Error {
    match err {
        GeneratorError::UnknownOption(_)
        | GeneratorError::TypeMismatch { .. }
        | GeneratorError::InvalidValue { .. } => Error::Validation(err.to_string()),
        GeneratorError::Generation(_) | GeneratorError::Export(_) => {
            Error::Internal(err.to_string())
        }
    }
}
