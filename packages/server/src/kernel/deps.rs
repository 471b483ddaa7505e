//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container used by job handlers
//! and route handlers. External services sit behind trait abstractions so
//! tests can substitute fakes.

use std::sync::Arc;

use sqlx::PgPool;

use crate::domains::moderation::{ContentClassifier, ResponseGenerator};
use crate::domains::users::JwtService;
use crate::kernel::jobs::JobQueue;

/// Server dependencies accessible to handlers.
///
/// Constructed once at startup and passed by reference; there are no
/// process-wide singletons for the external classifier/generator clients.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Content classifier for the moderation pipeline
    pub classifier: Arc<dyn ContentClassifier>,
    /// Response generator for auto-replies
    pub responder: Arc<dyn ResponseGenerator>,
    /// Background job queue
    pub job_queue: Arc<dyn JobQueue>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        classifier: Arc<dyn ContentClassifier>,
        responder: Arc<dyn ResponseGenerator>,
        job_queue: Arc<dyn JobQueue>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            classifier,
            responder,
            job_queue,
            jwt_service,
        }
    }
}
