//! Build domain entities for Scaffoldweb
//!
//! A build request becomes a `JobDraft` (ordered generator output, ids not
//! yet assigned), which the store turns into a `Job` whose resources carry
//! their assigned ids. Jobs and resources are immutable once stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single stored artifact: an opaque blob plus its assigned identity.
///
/// Ids come from one strictly increasing store-wide counter; within a job
/// they are consecutive in resource order, so `resources[k].id ==
/// resources[0].id + k`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub data: Vec<u8>,
}

/// The record of one build request: creation time plus the ordered
/// resources it produced. The first resource is the primary artifact whose
/// parsed content links to the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resources: Vec<Resource>,
}

impl Job {
    /// The primary (metadata-bearing) artifact, if any resources exist.
    pub fn primary(&self) -> Option<&Resource> {
        self.resources.first()
    }

    /// Build time as integer seconds since epoch.
    pub fn timestamp(&self) -> i64 {
        self.created_at.timestamp()
    }

    /// Assigned resource ids in storage order.
    pub fn resource_ids(&self) -> Vec<i64> {
        self.resources.iter().map(|r| r.id).collect()
    }

    /// History read model for this job.
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id,
            created_at: self.created_at,
            resource_ids: self.resource_ids(),
        }
    }
}

/// A build request before storage: blobs captured in generator output
/// order, resource ids not yet assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub blobs: Vec<Vec<u8>>,
}

impl JobDraft {
    /// Wrap generator output, stamping the build time. Order is preserved;
    /// blob content is opaque at this layer and not validated.
    pub fn new(blobs: Vec<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            blobs,
        }
    }
}

/// Read model for job history listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resource_ids: Vec<i64>,
}
