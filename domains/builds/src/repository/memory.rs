//! In-memory build store
//!
//! The default backend. Holds the id counter, resource index, and job
//! history behind a single `RwLock`, so id assignment and the append share
//! one critical section: concurrent `add_job` calls can never interleave id
//! ranges, and a job's resources become visible all at once when the guard
//! drops. Contents live for the process lifetime only.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use scaffoldweb_common::{Error, Result};

use crate::domain::entities::{Job, JobDraft, JobSummary, Resource};
use crate::repository::BuildStore;

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    resources: HashMap<i64, Vec<u8>>,
    jobs: Vec<JobSummary>,
}

/// In-memory build store.
#[derive(Debug)]
pub struct MemoryBuildStore {
    state: RwLock<MemoryState>,
}

impl MemoryBuildStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                resources: HashMap::new(),
                jobs: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryBuildStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BuildStore for MemoryBuildStore {
    async fn add_job(&self, draft: JobDraft) -> Result<Job> {
        let JobDraft {
            id,
            created_at,
            blobs,
        } = draft;

        let mut state = self
            .state
            .write()
            .map_err(|_| Error::Internal("build store lock poisoned".to_string()))?;

        let first_id = state.next_id;
        let resources: Vec<Resource> = blobs
            .into_iter()
            .enumerate()
            .map(|(k, data)| Resource {
                id: first_id + k as i64,
                data,
            })
            .collect();
        state.next_id = first_id + resources.len() as i64;

        for resource in &resources {
            state.resources.insert(resource.id, resource.data.clone());
        }

        let job = Job {
            id,
            created_at,
            resources,
        };
        state.jobs.push(job.summary());

        Ok(job)
    }

    async fn find_resource(&self, id: i64) -> Result<Option<Vec<u8>>> {
        let state = self
            .state
            .read()
            .map_err(|_| Error::Internal("build store lock poisoned".to_string()))?;
        Ok(state.resources.get(&id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let state = self
            .state
            .read()
            .map_err(|_| Error::Internal("build store lock poisoned".to_string()))?;
        Ok(state.jobs.clone())
    }
}
