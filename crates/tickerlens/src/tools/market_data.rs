//! Price and fundamentals tools

use super::Tool;
use crate::Result;
use crate::data::MarketDataClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tickerlens_llm::tools::schema;

#[derive(Debug, Deserialize)]
struct TickerParams {
    ticker: String,
}

fn ticker_schema() -> Value {
    schema::object(
        json!({ "ticker": schema::string("Stock ticker symbol, e.g. AAPL") }),
        vec!["ticker"],
    )
}

fn parse_ticker(params: Value) -> Result<String> {
    let params: TickerParams =
        serde_json::from_value(params).map_err(|e| crate::Error::Tool(e.to_string()))?;
    Ok(params.ticker.to_uppercase())
}

/// Tool returning the technical snapshot for a ticker
pub struct TechnicalDataTool {
    client: Arc<MarketDataClient>,
}

impl TechnicalDataTool {
    /// Create the tool over a shared market data client
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for TechnicalDataTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let ticker = parse_ticker(params)?;
        let snapshot = self.client.technical_snapshot(&ticker).await;
        Ok(serde_json::to_value(snapshot)?)
    }

    fn name(&self) -> &str {
        "get_technical_data"
    }

    fn description(&self) -> &str {
        "Get price-derived technical data for a stock: current price, 52-week range, \
         50/200-day moving averages, volume, and year-to-date change. Fields may be null \
         when data is unavailable."
    }

    fn parameters(&self) -> Value {
        ticker_schema()
    }
}

/// Tool returning the fundamental snapshot for a ticker
pub struct FundamentalDataTool {
    client: Arc<MarketDataClient>,
}

impl FundamentalDataTool {
    /// Create the tool over a shared market data client
    pub fn new(client: Arc<MarketDataClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FundamentalDataTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let ticker = parse_ticker(params)?;
        let snapshot = self.client.fundamental_snapshot(&ticker).await;
        Ok(serde_json::to_value(snapshot)?)
    }

    fn name(&self) -> &str {
        "get_fundamental_data"
    }

    fn description(&self) -> &str {
        "Get valuation fundamentals for a stock: market cap, trailing and forward P/E, \
         EPS, revenue, profit margin, debt-to-equity, dividend yield, sector, and industry. \
         Fields may be null when data is unavailable."
    }

    fn parameters(&self) -> Value {
        ticker_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ticker_uppercases() {
        assert_eq!(parse_ticker(json!({"ticker": "aapl"})).unwrap(), "AAPL");
    }

    #[test]
    fn test_parse_ticker_rejects_missing() {
        assert!(parse_ticker(json!({})).is_err());
    }

    #[tokio::test]
    async fn test_technical_tool_shape() {
        let tool = TechnicalDataTool::new(Arc::new(MarketDataClient::new()));
        assert_eq!(tool.name(), "get_technical_data");
        assert_eq!(tool.parameters()["required"][0], "ticker");
    }
}
