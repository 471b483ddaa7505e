//! PostgreSQL-backed job queue implementation.
//!
//! This module provides the core job queue functionality for storing
//! and retrieving jobs from PostgreSQL.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::job::Job;

/// Metadata for job payload serialization.
///
/// Job payload structs implement this trait to provide type information
/// used by the queue and the registry.
pub trait JobMeta {
    /// The job type string (stable identifier for the registry).
    const JOB_TYPE: &'static str;

    /// Maximum retries for this job.
    ///
    /// The default is zero: a failed job stays failed. Moderation work is
    /// deliberately at-most-once.
    fn max_retries(&self) -> i32 {
        0
    }
}

/// A claimed job ready for execution.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    /// The job ID
    pub id: Uuid,
    /// The job type string
    pub job_type: String,
    /// The serialized payload
    pub args: serde_json::Value,
}

impl ClaimedJob {
    /// Deserialize the job payload.
    pub fn deserialize<J: DeserializeOwned>(&self) -> Result<J> {
        serde_json::from_value(self.args.clone())
            .map_err(|e| anyhow!("failed to deserialize {} payload: {}", self.job_type, e))
    }
}

/// Trait for job queue operations.
///
/// Implementations provide the storage and retrieval of serialized job
/// payloads for background execution. The raw methods are object-safe;
/// typed enqueueing lives on [`JobQueueExt`].
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a raw payload, optionally scheduled for future execution.
    async fn enqueue_raw(
        &self,
        job_type: &str,
        args: serde_json::Value,
        max_retries: i32,
        run_at: Option<DateTime<Utc>>,
    ) -> Result<Uuid>;

    /// Claim up to `limit` ready jobs for processing.
    async fn claim(&self, limit: i64) -> Result<Vec<ClaimedJob>>;

    /// Mark a job as successfully completed.
    async fn mark_succeeded(&self, job_id: Uuid) -> Result<()>;

    /// Mark a job as failed with an error.
    ///
    /// If retries remain, the job is re-queued with exponential backoff.
    async fn mark_failed(&self, job_id: Uuid, error: &str) -> Result<()>;
}

/// Typed convenience methods over any [`JobQueue`].
#[async_trait]
pub trait JobQueueExt: JobQueue {
    /// Enqueue a job for immediate execution.
    async fn enqueue<J>(&self, job: &J) -> Result<Uuid>
    where
        J: JobMeta + Serialize + Sync,
    {
        self.enqueue_raw(J::JOB_TYPE, serde_json::to_value(job)?, job.max_retries(), None)
            .await
    }

    /// Schedule a job for future execution.
    async fn schedule<J>(&self, job: &J, run_at: DateTime<Utc>) -> Result<Uuid>
    where
        J: JobMeta + Serialize + Sync,
    {
        self.enqueue_raw(
            J::JOB_TYPE,
            serde_json::to_value(job)?,
            job.max_retries(),
            Some(run_at),
        )
        .await
    }
}

impl<Q: JobQueue + ?Sized> JobQueueExt for Q {}

/// PostgreSQL-backed job queue implementation.
pub struct PostgresJobQueue {
    db: PgPool,
}

impl PostgresJobQueue {
    /// Create a new PostgreSQL job queue.
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobQueue for PostgresJobQueue {
    async fn enqueue_raw(
        &self,
        job_type: &str,
        args: serde_json::Value,
        max_retries: i32,
        run_at: Option<DateTime<Utc>>,
    ) -> Result<Uuid> {
        let mut job = Job::new(job_type.to_string(), args, max_retries);
        if let Some(run_at) = run_at {
            job.next_run_at = Some(run_at);
        }

        debug!(
            job_id = %job.id,
            job_type = %job_type,
            run_at = ?run_at,
            "enqueueing job"
        );

        let inserted = job.insert(&self.db).await?;
        Ok(inserted.id)
    }

    async fn claim(&self, limit: i64) -> Result<Vec<ClaimedJob>> {
        let jobs = Job::claim_ready(&self.db, limit).await?;

        Ok(jobs
            .into_iter()
            .map(|job| ClaimedJob {
                id: job.id,
                job_type: job.job_type,
                args: job.args,
            })
            .collect())
    }

    async fn mark_succeeded(&self, job_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'succeeded',
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> Result<()> {
        // Re-queue with exponential backoff while retries remain, otherwise
        // leave the row failed with the error recorded.
        let requeued = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'pending',
                retry_count = retry_count + 1,
                next_run_at = NOW() + (POWER(2, retry_count) || ' seconds')::INTERVAL,
                error_message = $1,
                updated_at = NOW()
            WHERE id = $2 AND retry_count < max_retries
            "#,
        )
        .bind(error)
        .bind(job_id)
        .execute(&self.db)
        .await?;

        if requeued.rows_affected() == 0 {
            sqlx::query(
                r#"
                UPDATE jobs
                SET status = 'failed',
                    error_message = $1,
                    updated_at = NOW()
                WHERE id = $2
                "#,
            )
            .bind(error)
            .bind(job_id)
            .execute(&self.db)
            .await?;
        }

        Ok(())
    }
}
