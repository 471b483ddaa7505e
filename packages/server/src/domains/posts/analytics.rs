//! Daily comment analytics.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("date_from must not be after date_to")]
    Inverted,
}

impl DateRange {
    /// Parse the `date_from`/`date_to` query parameters.
    pub fn parse(date_from: &str, date_to: &str) -> Result<Self, DateRangeError> {
        let from = NaiveDate::parse_from_str(date_from, "%Y-%m-%d")
            .map_err(|_| DateRangeError::InvalidDate(date_from.to_string()))?;
        let to = NaiveDate::parse_from_str(date_to, "%Y-%m-%d")
            .map_err(|_| DateRangeError::InvalidDate(date_to.to_string()))?;
        if from > to {
            return Err(DateRangeError::Inverted);
        }
        Ok(Self { from, to })
    }
}

/// One day of comment activity. Days with no comments are omitted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailyCommentStats {
    pub date: NaiveDate,
    pub total_comments: i64,
    pub blocked_comments: i64,
}

/// Per-day comment totals over the range, inclusive on both ends.
pub async fn daily_comment_stats(pool: &PgPool, range: DateRange) -> Result<Vec<DailyCommentStats>> {
    sqlx::query_as::<_, DailyCommentStats>(
        r#"
        SELECT created_at::date AS date,
               COUNT(*) AS total_comments,
               COUNT(*) FILTER (WHERE status = 'blocked') AS blocked_comments
        FROM comments
        WHERE created_at::date >= $1 AND created_at::date <= $2
        GROUP BY created_at::date
        ORDER BY date
        "#,
    )
    .bind(range.from)
    .bind(range.to)
    .fetch_all(pool)
    .await
    .context("failed to compute daily comment stats")
}
