//! Agent tools
//!
//! Tools wrap the data collaborators and expose them to the model through
//! the chat-completions function-calling interface. Snapshot degradation
//! happens in the collaborators; tools serialize whatever they get, so a
//! degraded fetch shows up as a null-heavy JSON object rather than an error.

pub mod indices;
pub mod market_data;
pub mod news;

pub use indices::MarketIndicesTool;
pub use market_data::{FundamentalDataTool, TechnicalDataTool};
pub use news::{GeopoliticalNewsTool, NewsSearchTool};

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tickerlens_llm::ToolSpec;

/// Trait for tools that analyst agents can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with the given parameters
    ///
    /// Parameters arrive as JSON matching [`Tool::parameters`]; the result
    /// is serialized back to the model verbatim.
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique tool name
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters
    fn parameters(&self) -> Value;
}

/// Registry of tools available to one agent
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self
            .tools
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// Specifications for every registered tool, for the chat request
    pub fn specs(&self) -> Vec<ToolSpec> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools
            .values()
            .map(|tool| ToolSpec::new(tool.name(), tool.description(), tool.parameters()))
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.len()
    }

    /// Whether the registry has no tools
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
