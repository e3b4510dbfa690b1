//! Chat-completion client layer for TickerLens
//!
//! Everything the analysis agents need to talk to an OpenAI-compatible
//! endpoint lives here:
//!
//! - Message and tool-call types in the chat-completions wire shape
//! - Request/response types with a builder for requests
//! - The [`ChatProvider`] trait that agents are written against
//! - [`OpenAiClient`], the concrete `reqwest` implementation
//! - A helper for pulling a JSON object out of prose replies

pub mod chat;
pub mod error;
pub mod json;
pub mod messages;
pub mod openai;
pub mod provider;
pub mod tools;

pub use chat::{ChatRequest, ChatResponse, FinishReason, TokenUsage};
pub use error::{LlmError, Result};
pub use json::first_json_object;
pub use messages::{ChatMessage, Role, ToolCall};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use provider::ChatProvider;
pub use tools::ToolSpec;
