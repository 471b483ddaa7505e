//! Content classification.
//!
//! The classifier is asked to answer with a bare "0" (inappropriate) or "1"
//! (fine). Models do not always comply, so the raw reply is folded into a
//! [`Verdict`] by substring inspection rather than strict equality: any "0"
//! anywhere in the reply rejects, otherwise any "1" accepts.

use anyhow::Result;
use async_trait::async_trait;
use groq_client::{ChatRequest, GroqClient, Message};

/// Classifier decision for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    /// The reply contained neither digit. Treated as an accept downstream,
    /// with a warning, so a rambling model cannot wedge content in pending.
    Malformed,
}

/// Fold a raw model reply into a verdict.
///
/// "0" wins over "1" when both appear, so a reply like "10" still rejects.
pub fn parse_verdict(raw: &str) -> Verdict {
    if raw.contains('0') {
        Verdict::Reject
    } else if raw.contains('1') {
        Verdict::Accept
    } else {
        Verdict::Malformed
    }
}

#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn classify(&self, content: &str) -> Result<Verdict>;
}

/// Classifier backed by the Groq chat completions API.
pub struct GroqClassifier {
    client: GroqClient,
    model: String,
}

impl GroqClassifier {
    pub fn new(client: GroqClient, model: String) -> Self {
        Self { client, model }
    }

    fn prompt(content: &str) -> String {
        format!(
            "Validate the following content: '{content}' \
             If it contains obscene words, hate speech, or any other inappropriate content, return 0. \
             Otherwise, return 1. Don't return any other except 0 or 1. \
             Don't provide any explanation and extra information."
        )
    }
}

#[async_trait]
impl ContentClassifier for GroqClassifier {
    async fn classify(&self, content: &str) -> Result<Verdict> {
        // Deterministic sampling; the reply should be a single digit.
        let request = ChatRequest::new(&self.model)
            .message(Message::user(Self::prompt(content)))
            .temperature(0.0)
            .top_p(0.0);

        let response = self.client.chat_completion(request).await?;
        Ok(parse_verdict(&response.content))
    }
}
