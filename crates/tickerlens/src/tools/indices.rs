//! Broad-market context tool

use super::Tool;
use crate::Result;
use crate::data::MarketClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tickerlens_llm::tools::schema;

/// Tool returning SPY/VIX/sector-ETF quotes and the fear-greed reading
pub struct MarketIndicesTool {
    client: Arc<MarketClient>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IndicesParams {
    sector: Option<String>,
}

impl MarketIndicesTool {
    /// Create the tool over a shared market client
    pub fn new(client: Arc<MarketClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MarketIndicesTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: IndicesParams = serde_json::from_value(params).unwrap_or_default();
        let snapshot = self.client.snapshot(params.sector.as_deref()).await;
        Ok(serde_json::to_value(snapshot)?)
    }

    fn name(&self) -> &str {
        "get_market_indices"
    }

    fn description(&self) -> &str {
        "Get broad market context: S&P 500 (SPY) and VIX quotes, the sector ETF for an \
         optional sector name, and the CNN fear & greed sentiment index. Fields may be \
         null when a feed is unavailable."
    }

    fn parameters(&self) -> Value {
        schema::object(
            json!({
                "sector": schema::string(
                    "Optional sector name, e.g. Technology, to include its SPDR sector ETF"
                ),
            }),
            vec![],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_shape() {
        let tool = MarketIndicesTool::new(Arc::new(MarketClient::new()));
        assert_eq!(tool.name(), "get_market_indices");
        assert!(tool.parameters()["required"].as_array().unwrap().is_empty());
    }
}
