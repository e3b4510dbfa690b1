//! Query router
//!
//! One structured-output model call per query. Every failure mode (request
//! error, unparseable reply, missing ticker) degrades to the UNKNOWN
//! decision rather than an error; UNKNOWN is a normal terminal state the
//! rest of the pipeline knows how to handle.

use super::prompts::ROUTER_SYSTEM_PROMPT;
use crate::Settings;
use crate::models::RouterDecision;
use std::sync::Arc;
use tickerlens_llm::{ChatMessage, ChatProvider, ChatRequest, first_json_object};
use tracing::{info, warn};

/// Routes free-text queries to analysis flags
pub struct Router {
    provider: Arc<dyn ChatProvider>,
    model: String,
    temperature: f32,
}

impl Router {
    /// Create a router over the shared provider
    pub fn new(provider: Arc<dyn ChatProvider>, settings: &Settings) -> Self {
        Self {
            provider,
            model: settings.llm.model.clone(),
            temperature: settings.llm.temperature,
        }
    }

    /// Classify a query into a routing decision
    pub async fn route(&self, query: &str) -> RouterDecision {
        let request = ChatRequest::builder(&self.model)
            .add_message(ChatMessage::system(ROUTER_SYSTEM_PROMPT))
            .add_message(ChatMessage::user(query))
            .temperature(self.temperature)
            .max_tokens(512)
            .build();

        let reply = match self.provider.chat(request).await {
            Ok(response) => response.message.text().unwrap_or_default().to_string(),
            Err(e) => {
                warn!(error = %e, "Router call failed, treating query as unroutable");
                return RouterDecision::unknown("router call failed");
            }
        };

        let decision = parse_decision(&reply);
        info!(
            ticker = %decision.ticker,
            technical = decision.run_technical,
            fundamental = decision.run_fundamental,
            news = decision.run_news,
            r#macro = decision.run_macro,
            "Query routed"
        );
        decision
    }
}

/// Parse the router reply, degrading to UNKNOWN on any miss
fn parse_decision(reply: &str) -> RouterDecision {
    let Some(json) = first_json_object(reply) else {
        warn!("Router reply contained no JSON object");
        return RouterDecision::unknown("unparseable router reply");
    };

    match serde_json::from_str::<RouterDecision>(json) {
        Ok(mut decision) => {
            decision.ticker = decision.ticker.trim().to_uppercase();
            if decision.ticker.is_empty() {
                return RouterDecision::unknown("router returned an empty ticker");
            }
            if decision.is_unknown() {
                // UNKNOWN always disables every analysis
                return RouterDecision::unknown(decision.reasoning);
            }
            decision
        }
        Err(e) => {
            warn!(error = %e, "Router reply JSON did not match the decision shape");
            RouterDecision::unknown("unparseable router reply")
        }
    }
}
