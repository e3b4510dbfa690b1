//! Chat provider trait definition

use crate::{ChatRequest, ChatResponse, Result};
use async_trait::async_trait;

/// Trait for chat-completion providers
///
/// Agents are written against this trait so tests can substitute a scripted
/// provider for the real HTTP client.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a chat completion
    ///
    /// # Arguments
    ///
    /// * `request` - The request with messages, tools, and sampling parameters
    ///
    /// # Returns
    ///
    /// The assistant's message together with finish reason and token usage
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Provider name (e.g., "openai")
    fn name(&self) -> &str;
}
