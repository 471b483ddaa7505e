//! Moderation domain: content classification, auto-responses, and the
//! background pipeline that connects them.

pub mod classifier;
pub mod jobs;
pub mod pipeline;
pub mod responder;
pub mod store;

pub use classifier::{parse_verdict, ContentClassifier, GroqClassifier, Verdict};
pub use pipeline::{AutoResponseOutcome, ModerationOutcome, ModerationPipeline};
pub use responder::{GroqResponder, ResponseGenerator};
pub use store::{AutoResponsePolicy, ModerationStore, PostgresModerationStore};
