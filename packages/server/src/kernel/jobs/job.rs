//! Job row model with CRUD operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed job for background processing
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub status: String,
    pub job_type: String,
    pub args: serde_json::Value,
    pub next_run_at: Option<DateTime<Utc>>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub max_retries: i32,
    pub retry_count: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job for immediate execution
    pub fn new(job_type: String, args: serde_json::Value, max_retries: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: "pending".to_string(),
            job_type,
            args,
            next_run_at: Some(now),
            last_run_at: None,
            max_retries,
            retry_count: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert the job into the database
    pub async fn insert(&self, pool: &PgPool) -> Result<Self> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                id, status, job_type, args, next_run_at, last_run_at,
                max_retries, retry_count, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(&self.status)
        .bind(&self.job_type)
        .bind(&self.args)
        .bind(self.next_run_at)
        .bind(self.last_run_at)
        .bind(self.max_retries)
        .bind(self.retry_count)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await?;

        Ok(job)
    }

    /// Claim up to `limit` ready jobs, marking them running.
    ///
    /// Uses `FOR UPDATE SKIP LOCKED` so concurrent workers never claim the
    /// same row.
    pub async fn claim_ready(pool: &PgPool, limit: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = 'running',
                last_run_at = NOW(),
                updated_at = NOW()
            WHERE id IN (
                SELECT id FROM jobs
                WHERE status = 'pending'
                  AND next_run_at <= NOW()
                ORDER BY next_run_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_pending_and_ready() {
        let job = Job::new("moderate_post".to_string(), serde_json::json!({}), 0);
        assert_eq!(job.status, "pending");
        assert_eq!(job.retry_count, 0);
        assert!(job.next_run_at.is_some());
        assert!(job.next_run_at.unwrap() <= Utc::now());
    }
}
