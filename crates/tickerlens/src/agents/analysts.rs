//! The four specialist analysts
//!
//! Each analyst is a [`ToolAgent`] with its own system prompt and tool set.
//! Construction wires shared data clients into per-analyst registries so
//! concurrent analysts never contend on each other's tools.

use super::executor::{AgentConfig, ToolAgent};
use super::prompts;
use crate::data::{MarketClient, MarketDataClient, NewsClient};
use crate::tools::{
    FundamentalDataTool, GeopoliticalNewsTool, MarketIndicesTool, NewsSearchTool,
    TechnicalDataTool, Tool, ToolRegistry,
};
use crate::{Result, Settings};
use std::sync::Arc;
use tickerlens_llm::ChatProvider;

/// The analyst specialties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalystKind {
    Technical,
    Fundamental,
    News,
    Macro,
}

impl AnalystKind {
    /// Agent name for logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Technical => "technical-analyst",
            Self::Fundamental => "fundamental-analyst",
            Self::News => "news-analyst",
            Self::Macro => "macro-analyst",
        }
    }

    fn system_prompt(self) -> &'static str {
        match self {
            Self::Technical => prompts::TECHNICAL_ANALYST_PROMPT,
            Self::Fundamental => prompts::FUNDAMENTAL_ANALYST_PROMPT,
            Self::News => prompts::NEWS_ANALYST_PROMPT,
            Self::Macro => prompts::MACRO_ANALYST_PROMPT,
        }
    }
}

/// Shared data clients handed to analyst constructors
#[derive(Clone)]
pub struct DataClients {
    pub market_data: Arc<MarketDataClient>,
    pub news: Arc<NewsClient>,
    pub market: Arc<MarketClient>,
}

impl DataClients {
    /// Create one set of clients for the whole pipeline
    pub fn new() -> Self {
        Self {
            market_data: Arc::new(MarketDataClient::new()),
            news: Arc::new(NewsClient::new()),
            market: Arc::new(MarketClient::new()),
        }
    }
}

impl Default for DataClients {
    fn default() -> Self {
        Self::new()
    }
}

/// One specialist analyst
pub struct Analyst {
    kind: AnalystKind,
    agent: ToolAgent,
}

impl Analyst {
    /// Build an analyst of the given kind
    pub fn new(
        kind: AnalystKind,
        provider: Arc<dyn ChatProvider>,
        settings: &Settings,
        clients: &DataClients,
    ) -> Self {
        let registry = Arc::new(ToolRegistry::new());
        for tool in analyst_tools(kind, clients) {
            registry.register(tool);
        }

        let config = AgentConfig::from_settings(settings, kind.system_prompt());
        let agent = ToolAgent::new(kind.name(), provider, registry, config);

        Self { kind, agent }
    }

    /// Which specialty this analyst covers
    pub fn kind(&self) -> AnalystKind {
        self.kind
    }

    /// Run the analyst for a ticker and return its prose
    pub async fn analyze(&self, ticker: &str) -> Result<String> {
        self.agent.run(prompts::analyst_input(self.kind, ticker)).await
    }
}

fn analyst_tools(kind: AnalystKind, clients: &DataClients) -> Vec<Arc<dyn Tool>> {
    match kind {
        AnalystKind::Technical => vec![Arc::new(TechnicalDataTool::new(Arc::clone(
            &clients.market_data,
        )))],
        AnalystKind::Fundamental => vec![Arc::new(FundamentalDataTool::new(Arc::clone(
            &clients.market_data,
        )))],
        AnalystKind::News => vec![Arc::new(NewsSearchTool::new(Arc::clone(&clients.news)))],
        AnalystKind::Macro => vec![
            Arc::new(MarketIndicesTool::new(Arc::clone(&clients.market))),
            Arc::new(GeopoliticalNewsTool::new(Arc::clone(&clients.news))),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(AnalystKind::Technical.name(), "technical-analyst");
        assert_eq!(AnalystKind::Macro.name(), "macro-analyst");
    }

    #[test]
    fn test_analyst_tool_sets() {
        let clients = DataClients::new();
        assert_eq!(analyst_tools(AnalystKind::Technical, &clients).len(), 1);
        assert_eq!(analyst_tools(AnalystKind::Macro, &clients).len(), 2);

        let news_tools = analyst_tools(AnalystKind::News, &clients);
        assert_eq!(news_tools[0].name(), "search_stock_news");
    }
}
