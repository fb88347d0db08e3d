//! Stored output retrieval handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use scaffoldweb_common::{Error, Result};

use crate::api::middleware::BuildsState;
use crate::domain::entities::JobSummary;

/// Job history response DTO
#[derive(Debug, Serialize)]
pub struct JobSummaryResponse {
    pub id: Uuid,
    pub timestamp: i64,
    pub created_at: DateTime<Utc>,
    pub resource_ids: Vec<i64>,
}

impl From<JobSummary> for JobSummaryResponse {
    fn from(s: JobSummary) -> Self {
        Self {
            id: s.id,
            timestamp: s.created_at.timestamp(),
            created_at: s.created_at,
            resource_ids: s.resource_ids,
        }
    }
}

/// Return the stored artifact for a resource id.
pub async fn get_output(
    State(state): State<BuildsState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let data = state
        .store
        .find_resource(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("No resource with id {}", id)))?;

    // Stored blobs are JSON exports; a blob that no longer parses is a bug,
    // not bad input.
    let value: Value = serde_json::from_slice(&data)?;
    Ok(Json(value))
}

/// List the job history in append order.
pub async fn list_jobs(State(state): State<BuildsState>) -> Result<Json<Vec<JobSummaryResponse>>> {
    let jobs = state.store.list_jobs().await?;
    let responses: Vec<JobSummaryResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
