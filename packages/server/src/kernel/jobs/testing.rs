//! In-memory job queue for tests.
//!
//! Implements the same [`JobQueue`] trait as the Postgres queue so tests can
//! assert on what the pipeline enqueued without a database.

use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::queue::{ClaimedJob, JobQueue};

/// A job recorded by [`TestJobQueue`].
#[derive(Debug, Clone)]
pub struct RecordedJob {
    pub id: Uuid,
    pub job_type: String,
    pub args: serde_json::Value,
    pub run_at: Option<DateTime<Utc>>,
}

/// In-memory queue that records enqueued jobs for assertions.
#[derive(Default)]
pub struct TestJobQueue {
    jobs: Mutex<Vec<RecordedJob>>,
    succeeded: Mutex<Vec<Uuid>>,
    failed: Mutex<Vec<(Uuid, String)>>,
}

impl TestJobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// All jobs ever enqueued, in order.
    pub fn recorded(&self) -> Vec<RecordedJob> {
        self.jobs.lock().unwrap().clone()
    }

    /// Jobs of a specific type.
    pub fn recorded_of_type(&self, job_type: &str) -> Vec<RecordedJob> {
        self.recorded()
            .into_iter()
            .filter(|j| j.job_type == job_type)
            .collect()
    }

    /// IDs marked succeeded.
    pub fn succeeded(&self) -> Vec<Uuid> {
        self.succeeded.lock().unwrap().clone()
    }

    /// IDs marked failed with their error messages.
    pub fn failed(&self) -> Vec<(Uuid, String)> {
        self.failed.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobQueue for TestJobQueue {
    async fn enqueue_raw(
        &self,
        job_type: &str,
        args: serde_json::Value,
        _max_retries: i32,
        run_at: Option<DateTime<Utc>>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.jobs.lock().unwrap().push(RecordedJob {
            id,
            job_type: job_type.to_string(),
            args,
            run_at,
        });
        Ok(id)
    }

    async fn claim(&self, limit: i64) -> Result<Vec<ClaimedJob>> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().unwrap();
        let mut claimed = Vec::new();
        let mut remaining = Vec::new();

        for job in jobs.drain(..) {
            let ready = job.run_at.map(|t| t <= now).unwrap_or(true);
            if ready && (claimed.len() as i64) < limit {
                claimed.push(ClaimedJob {
                    id: job.id,
                    job_type: job.job_type,
                    args: job.args,
                });
            } else {
                remaining.push(job);
            }
        }

        *jobs = remaining;
        Ok(claimed)
    }

    async fn mark_succeeded(&self, job_id: Uuid) -> Result<()> {
        self.succeeded.lock().unwrap().push(job_id);
        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> Result<()> {
        self.failed.lock().unwrap().push((job_id, error.to_string()));
        Ok(())
    }
}
