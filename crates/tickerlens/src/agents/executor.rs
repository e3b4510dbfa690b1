//! Model/tool loop shared by all analyst agents
//!
//! The loop: send the conversation with available tools, execute any tool
//! calls the model makes, feed results back, repeat until the model stops
//! naturally or the iteration cap is hit.

use crate::Result;
use crate::tools::ToolRegistry;
use std::sync::Arc;
use tickerlens_llm::{ChatMessage, ChatProvider, ChatRequest, FinishReason};
use tracing::{debug, info, warn};

/// Per-agent model configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Model identifier
    pub model: String,

    /// System prompt
    pub system_prompt: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Iteration cap for the tool loop
    pub max_iterations: usize,
}

impl AgentConfig {
    /// Config derived from settings with an agent-specific system prompt
    pub fn from_settings(settings: &crate::Settings, system_prompt: impl Into<String>) -> Self {
        Self {
            model: settings.llm.model.clone(),
            system_prompt: system_prompt.into(),
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
            max_iterations: 6,
        }
    }
}

/// An agent that can call tools while reasoning
pub struct ToolAgent {
    name: String,
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl ToolAgent {
    /// Create an agent
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            tools,
            config,
        }
    }

    /// Agent name, used in logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the tool loop for one input and return the final text
    pub async fn run(&self, input: String) -> Result<String> {
        let mut conversation = vec![
            ChatMessage::system(self.config.system_prompt.clone()),
            ChatMessage::user(input),
        ];
        let specs = self.tools.specs();

        for iteration in 1..=self.config.max_iterations {
            info!(
                agent = %self.name,
                iteration,
                max_iterations = self.config.max_iterations,
                "Agent iteration started"
            );

            let mut builder = ChatRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature);
            if !specs.is_empty() {
                builder = builder.tools(specs.clone());
            }

            let response = self.provider.chat(builder.build()).await?;
            debug!(
                agent = %self.name,
                finish = ?response.finish,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                "Model response received"
            );

            match response.finish {
                FinishReason::Stop => {
                    let text = response.message.text().unwrap_or_default().to_string();
                    info!(agent = %self.name, iteration, chars = text.len(), "Agent completed");
                    return Ok(text);
                }
                FinishReason::Length => {
                    warn!(agent = %self.name, "Completion hit the token limit");
                    return Ok(response.message.text().unwrap_or_default().to_string());
                }
                FinishReason::ToolCalls => {
                    let calls = response.message.tool_calls.clone();
                    conversation.push(response.message);

                    if calls.is_empty() {
                        warn!(agent = %self.name, "Tool-calls finish without tool calls");
                        return Ok(String::new());
                    }

                    for call in calls {
                        conversation.push(self.execute_call(&call).await);
                    }
                }
            }
        }

        warn!(
            agent = %self.name,
            max_iterations = self.config.max_iterations,
            "Iteration cap reached without completion"
        );
        Ok("Analysis incomplete: iteration cap reached".to_string())
    }

    /// Execute one tool call, turning failures into an error tool result
    async fn execute_call(&self, call: &tickerlens_llm::ToolCall) -> ChatMessage {
        info!(agent = %self.name, tool = %call.name, "Executing tool");

        let Some(tool) = self.tools.get(&call.name) else {
            warn!(agent = %self.name, tool = %call.name, "Unknown tool requested");
            return ChatMessage::tool_result(
                call.id.clone(),
                format!("Error: unknown tool {}", call.name),
            );
        };

        let start = std::time::Instant::now();
        match tool.execute(call.arguments.clone()).await {
            Ok(result) => {
                let payload = result.to_string();
                debug!(
                    agent = %self.name,
                    tool = %call.name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    result_chars = payload.len(),
                    "Tool execution succeeded"
                );
                ChatMessage::tool_result(call.id.clone(), payload)
            }
            Err(e) => {
                warn!(
                    agent = %self.name,
                    tool = %call.name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Tool execution failed"
                );
                ChatMessage::tool_result(call.id.clone(), format!("Error: {e}"))
            }
        }
    }
}
