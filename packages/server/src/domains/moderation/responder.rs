//! Auto-response generation.

use anyhow::Result;
use async_trait::async_trait;
use groq_client::{ChatRequest, GroqClient, Message};

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate a reply, written in the post author's voice, to a comment.
    async fn generate(&self, post_content: &str, comment_content: &str) -> Result<String>;
}

/// Response generator backed by the Groq chat completions API.
pub struct GroqResponder {
    client: GroqClient,
    model: String,
}

impl GroqResponder {
    pub fn new(client: GroqClient, model: String) -> Self {
        Self { client, model }
    }

    fn prompt(post_content: &str, comment_content: &str) -> String {
        format!(
            "You are the author of a post with the following content: '{post_content}'. \
             A user has commented on your post with the following content: '{comment_content}'. \
             Generate a response to the user comment. The response should be polite, respectful, and engaging. \
             Try to encourage further discussion or provide additional information related to the post content. \
             Please provide a response to the user comment without any additional information or explanation."
        )
    }
}

#[async_trait]
impl ResponseGenerator for GroqResponder {
    async fn generate(&self, post_content: &str, comment_content: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::user(Self::prompt(post_content, comment_content)))
            .temperature(1.0);

        let response = self.client.chat_completion(request).await?;
        Ok(response.content)
    }
}
