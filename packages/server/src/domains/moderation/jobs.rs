//! Job payloads and handlers for the moderation pipeline.
//!
//! Handlers swallow pipeline errors after logging them: a classifier outage
//! leaves the entity pending, and nothing retries on its own.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::common::{CommentId, PostId};
use crate::kernel::jobs::{JobMeta, JobRegistry};
use crate::kernel::ServerDeps;

use super::pipeline::ModerationPipeline;
use super::store::PostgresModerationStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratePostJob {
    pub post_id: PostId,
}

impl JobMeta for ModeratePostJob {
    const JOB_TYPE: &'static str = "moderate_post";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerateCommentJob {
    pub comment_id: CommentId,
}

impl JobMeta for ModerateCommentJob {
    const JOB_TYPE: &'static str = "moderate_comment";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAutoResponseJob {
    pub comment_id: CommentId,
}

impl JobMeta for GenerateAutoResponseJob {
    const JOB_TYPE: &'static str = "generate_auto_response";
}

/// Build the pipeline from the shared dependency container.
fn pipeline(deps: &ServerDeps) -> ModerationPipeline {
    ModerationPipeline::new(
        Arc::new(PostgresModerationStore::new(deps.db_pool.clone())),
        deps.classifier.clone(),
        deps.responder.clone(),
        deps.job_queue.clone(),
    )
}

/// Register all moderation job handlers.
pub fn register_moderation_jobs(registry: &mut JobRegistry) {
    registry.register::<ModeratePostJob, _, _>(|job, deps| async move {
        if let Err(e) = pipeline(&deps).moderate_post(job.post_id).await {
            error!(post_id = %job.post_id, error = %e, "post moderation failed, leaving post pending");
        }
        Ok(())
    });

    registry.register::<ModerateCommentJob, _, _>(|job, deps| async move {
        if let Err(e) = pipeline(&deps).moderate_comment(job.comment_id).await {
            error!(comment_id = %job.comment_id, error = %e, "comment moderation failed, leaving comment pending");
        }
        Ok(())
    });

    registry.register::<GenerateAutoResponseJob, _, _>(|job, deps| async move {
        if let Err(e) = pipeline(&deps).generate_auto_response(job.comment_id).await {
            error!(comment_id = %job.comment_id, error = %e, "auto-response generation failed");
        }
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_types_are_distinct_and_stable() {
        assert_eq!(ModeratePostJob::JOB_TYPE, "moderate_post");
        assert_eq!(ModerateCommentJob::JOB_TYPE, "moderate_comment");
        assert_eq!(GenerateAutoResponseJob::JOB_TYPE, "generate_auto_response");
    }

    #[test]
    fn all_moderation_jobs_are_registered() {
        let mut registry = JobRegistry::new();
        register_moderation_jobs(&mut registry);

        assert!(registry.is_registered("moderate_post"));
        assert!(registry.is_registered("moderate_comment"));
        assert!(registry.is_registered("generate_auto_response"));
    }

    #[test]
    fn payloads_roundtrip_through_json() {
        let job = ModeratePostJob {
            post_id: PostId::new(),
        };
        let value = serde_json::to_value(&job).unwrap();
        let back: ModeratePostJob = serde_json::from_value(value).unwrap();
        assert_eq!(back.post_id, job.post_id);
    }
}
