//! SQLite build store
//!
//! Durable backend over sqlx. The pool is capped at one connection: SQLite
//! serializes writers anyway, and a shared `sqlite::memory:` database only
//! exists per-connection. Id assignment reads the current maximum and
//! inserts the new rows inside one transaction, so concurrent adds cannot
//! interleave id ranges and a failed add rolls back without leaving a
//! partially visible job.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use scaffoldweb_common::{Error, Result};

use crate::domain::entities::{Job, JobDraft, JobSummary, Resource};
use crate::repository::BuildStore;

const CREATE_JOBS: &str = "\
    CREATE TABLE IF NOT EXISTS jobs (\
        id TEXT PRIMARY KEY,\
        created_at INTEGER NOT NULL\
    )";

const CREATE_RESOURCES: &str = "\
    CREATE TABLE IF NOT EXISTS resources (\
        id INTEGER PRIMARY KEY,\
        job_id TEXT NOT NULL,\
        position INTEGER NOT NULL,\
        data BLOB NOT NULL\
    )";

/// SQLite-backed build store.
#[derive(Clone)]
pub struct SqliteBuildStore {
    pool: SqlitePool,
}

impl SqliteBuildStore {
    /// Connect to the database (created if missing) and ensure the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_JOBS).execute(&pool).await?;
        sqlx::query(CREATE_RESOURCES).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl BuildStore for SqliteBuildStore {
    async fn add_job(&self, draft: JobDraft) -> Result<Job> {
        let JobDraft {
            id,
            created_at,
            blobs,
        } = draft;

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO jobs (id, created_at) VALUES ($1, $2)")
            .bind(id.to_string())
            .bind(created_at.timestamp())
            .execute(&mut *tx)
            .await?;

        let (max_id,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(id), 0) FROM resources")
            .fetch_one(&mut *tx)
            .await?;
        let first_id = max_id + 1;

        let mut resources = Vec::with_capacity(blobs.len());
        for (k, data) in blobs.into_iter().enumerate() {
            let resource_id = first_id + k as i64;
            sqlx::query(
                "INSERT INTO resources (id, job_id, position, data) VALUES ($1, $2, $3, $4)",
            )
            .bind(resource_id)
            .bind(id.to_string())
            .bind(k as i64)
            .bind(&data)
            .execute(&mut *tx)
            .await?;
            resources.push(Resource {
                id: resource_id,
                data,
            });
        }

        tx.commit().await?;

        Ok(Job {
            id,
            created_at,
            resources,
        })
    }

    async fn find_resource(&self, id: i64) -> Result<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT data FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(data,)| data))
    }

    async fn list_jobs(&self) -> Result<Vec<JobSummary>> {
        let job_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT id, created_at FROM jobs ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;
        let resource_rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT job_id, id FROM resources ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let mut ids_by_job: HashMap<String, Vec<i64>> = HashMap::new();
        for (job_id, resource_id) in resource_rows {
            ids_by_job.entry(job_id).or_default().push(resource_id);
        }

        job_rows
            .into_iter()
            .map(|(raw_id, created_at)| -> Result<JobSummary> {
                let resource_ids = ids_by_job.remove(&raw_id).unwrap_or_default();
                let id = Uuid::parse_str(&raw_id)
                    .map_err(|e| Error::Internal(format!("corrupt job id '{raw_id}': {e}")))?;
                let created_at = DateTime::from_timestamp(created_at, 0).ok_or_else(|| {
                    Error::Internal(format!("corrupt job timestamp {created_at}"))
                })?;
                Ok(JobSummary {
                    id,
                    created_at,
                    resource_ids,
                })
            })
            .collect()
    }
}
