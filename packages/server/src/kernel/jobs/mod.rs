//! Job infrastructure for background command execution.
//!
//! This module provides the kernel-level infrastructure for job execution:
//! - [`PostgresJobQueue`] - Database-backed job queue
//! - [`JobRegistry`] - Maps job type strings to handlers
//! - [`JobRunner`] - Long-running service that polls and executes jobs
//! - [`Job`] - Job row model with CRUD operations
//!
//! # Architecture
//!
//! ```text
//! Action calls queue.enqueue(job)
//!     │
//!     └─► Insert to jobs table (pending)
//!
//! JobRunner
//!     │
//!     ├─► Poll DB (claim ready jobs, FOR UPDATE SKIP LOCKED)
//!     ├─► Deserialize payload + dispatch handler (JobRegistry)
//!     └─► Mark succeeded/failed
//! ```
//!
//! Domain-specific job payloads and handlers live in their respective
//! domains. This module only provides the infrastructure.

mod job;
mod queue;
mod registry;
mod runner;
pub mod testing;

pub use job::Job;
pub use queue::{ClaimedJob, JobMeta, JobQueue, JobQueueExt, PostgresJobQueue};
pub use registry::{JobRegistry, SharedJobRegistry};
pub use runner::{JobRunner, JobRunnerConfig};
