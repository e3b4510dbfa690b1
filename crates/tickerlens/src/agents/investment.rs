//! Investment outlook synthesizer
//!
//! Merges whatever analyst prose the pipeline produced into one fixed-format
//! outlook. When the router could not identify a ticker the synthesizer
//! returns a canned low-confidence outlook without calling the model.

use super::prompts::{INVESTMENT_SYSTEM_PROMPT, UNKNOWN_TICKER_OUTLOOK, investment_input};
use crate::models::AnalysisState;
use crate::{Result, Settings};
use std::sync::Arc;
use tickerlens_llm::{ChatMessage, ChatProvider, ChatRequest};
use tracing::info;

/// Produces the AI investment outlook section
pub struct InvestmentSynthesizer {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl InvestmentSynthesizer {
    /// Create a synthesizer over the shared provider
    pub fn new(provider: Arc<dyn ChatProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
        }
    }

    /// Synthesize the outlook for the current state
    pub async fn synthesize(&self, state: &AnalysisState) -> Result<String> {
        if state.decision.is_unknown() {
            info!("No ticker identified, returning canned outlook without a model call");
            return Ok(UNKNOWN_TICKER_OUTLOOK.to_string());
        }

        let request = ChatRequest::builder(&self.model)
            .add_message(ChatMessage::system(INVESTMENT_SYSTEM_PROMPT))
            .add_message(ChatMessage::user(investment_input(state)))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();

        let response = self.provider.chat(request).await?;
        Ok(response.message.text().unwrap_or_default().to_string())
    }
}
