//! The moderation pipeline.
//!
//! Runs inside job handlers, never inside request handlers. Each entry point
//! is idempotent against deleted rows: moderating an entity that no longer
//! exists is a logged no-op, not an error.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::common::{CommentId, PostId};
use crate::domains::posts::models::ModerationStatus;
use crate::kernel::jobs::{JobQueue, JobQueueExt};

use super::classifier::{ContentClassifier, Verdict};
use super::jobs::GenerateAutoResponseJob;
use super::responder::ResponseGenerator;
use super::store::ModerationStore;

/// Result of a moderation pass over a post or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    /// The entity was classified and its status updated.
    Moderated(ModerationStatus),
    /// The entity was deleted before the job ran.
    EntityMissing,
}

/// Result of an auto-response attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoResponseOutcome {
    /// A reply comment was created, already approved.
    Created(CommentId),
    /// The trigger comment is no longer approved; nothing was posted.
    NotApproved,
    /// The trigger comment or its post was deleted before the job ran.
    EntityMissing,
}

pub struct ModerationPipeline {
    store: Arc<dyn ModerationStore>,
    classifier: Arc<dyn ContentClassifier>,
    responder: Arc<dyn ResponseGenerator>,
    job_queue: Arc<dyn JobQueue>,
}

impl ModerationPipeline {
    pub fn new(
        store: Arc<dyn ModerationStore>,
        classifier: Arc<dyn ContentClassifier>,
        responder: Arc<dyn ResponseGenerator>,
        job_queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            store,
            classifier,
            responder,
            job_queue,
        }
    }

    /// Classify a pending post and persist the resulting status.
    pub async fn moderate_post(&self, post_id: PostId) -> Result<ModerationOutcome> {
        let Some(post) = self.store.post_by_id(post_id).await? else {
            info!(%post_id, "post deleted before moderation ran");
            return Ok(ModerationOutcome::EntityMissing);
        };

        let verdict = self
            .classifier
            .classify(&post.content)
            .await
            .context("classifier call failed for post")?;

        let status = self.status_for(verdict);
        self.store.set_post_status(post_id, status).await?;

        info!(%post_id, %status, "moderated post");
        Ok(ModerationOutcome::Moderated(status))
    }

    /// Classify a pending comment, persist the status, and schedule an
    /// auto-response when the post author's policy calls for one.
    pub async fn moderate_comment(&self, comment_id: CommentId) -> Result<ModerationOutcome> {
        let Some(comment) = self.store.comment_by_id(comment_id).await? else {
            info!(%comment_id, "comment deleted before moderation ran");
            return Ok(ModerationOutcome::EntityMissing);
        };

        let verdict = self
            .classifier
            .classify(&comment.content)
            .await
            .context("classifier call failed for comment")?;

        let status = self.status_for(verdict);
        self.store.set_comment_status(comment_id, status).await?;
        info!(%comment_id, %status, "moderated comment");

        if status == ModerationStatus::Approved {
            self.maybe_schedule_auto_response(&comment).await?;
        }

        Ok(ModerationOutcome::Moderated(status))
    }

    async fn maybe_schedule_auto_response(
        &self,
        comment: &crate::domains::posts::models::Comment,
    ) -> Result<()> {
        let Some(post) = self.store.post_by_id(comment.post_id).await? else {
            warn!(comment_id = %comment.id, "post gone, skipping auto-response");
            return Ok(());
        };

        // Authors never auto-reply to themselves
        if post.author_id == comment.author_id {
            return Ok(());
        }

        let Some(policy) = self.store.auto_response_policy(post.author_id).await? else {
            warn!(author_id = %post.author_id, "post author gone, skipping auto-response");
            return Ok(());
        };
        if !policy.enabled {
            return Ok(());
        }

        // The delay counts from moderation, not from comment creation
        let run_at = Utc::now() + Duration::seconds(i64::from(policy.delay_minutes) * 60);
        self.job_queue
            .schedule(&GenerateAutoResponseJob { comment_id: comment.id }, run_at)
            .await
            .context("failed to schedule auto-response")?;

        info!(
            comment_id = %comment.id,
            delay_minutes = policy.delay_minutes,
            "scheduled auto-response"
        );
        Ok(())
    }

    /// Generate and post the delayed auto-response for an approved comment.
    ///
    /// The world may have changed since scheduling: the comment or post can
    /// be gone, or the comment demoted. All of those end the attempt quietly.
    pub async fn generate_auto_response(
        &self,
        comment_id: CommentId,
    ) -> Result<AutoResponseOutcome> {
        let Some(comment) = self.store.comment_by_id(comment_id).await? else {
            info!(%comment_id, "comment deleted before auto-response ran");
            return Ok(AutoResponseOutcome::EntityMissing);
        };
        if comment.status != ModerationStatus::Approved {
            info!(%comment_id, status = %comment.status, "comment not approved, skipping auto-response");
            return Ok(AutoResponseOutcome::NotApproved);
        }

        let Some(post) = self.store.post_by_id(comment.post_id).await? else {
            info!(%comment_id, "post deleted before auto-response ran");
            return Ok(AutoResponseOutcome::EntityMissing);
        };

        let reply = self
            .responder
            .generate(&post.content, &comment.content)
            .await
            .context("response generation failed")?;

        // The reply is posted verbatim in the post author's name and skips
        // moderation entirely.
        let created = self
            .store
            .insert_approved_comment(post.id, post.author_id, &reply)
            .await?;

        info!(comment_id = %comment_id, reply_id = %created.id, "posted auto-response");
        Ok(AutoResponseOutcome::Created(created.id))
    }

    fn status_for(&self, verdict: Verdict) -> ModerationStatus {
        match verdict {
            Verdict::Reject => ModerationStatus::Blocked,
            Verdict::Accept => ModerationStatus::Approved,
            Verdict::Malformed => {
                warn!("classifier returned neither 0 nor 1, approving by default");
                ModerationStatus::Approved
            }
        }
    }
}
