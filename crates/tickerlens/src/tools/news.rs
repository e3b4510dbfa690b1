//! Headline search tools

use super::Tool;
use crate::Result;
use crate::data::NewsClient;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tickerlens_llm::tools::schema;

const STOCK_NEWS_COUNT: usize = 8;
const GEOPOLITICAL_NEWS_COUNT: usize = 5;

/// Tool returning recent headlines for a ticker
pub struct NewsSearchTool {
    client: Arc<NewsClient>,
}

#[derive(Debug, Deserialize)]
struct NewsParams {
    ticker: String,
}

impl NewsSearchTool {
    /// Create the tool over a shared news client
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    async fn execute(&self, params: Value) -> Result<Value> {
        let params: NewsParams =
            serde_json::from_value(params).map_err(|e| crate::Error::Tool(e.to_string()))?;
        let digest = self
            .client
            .stock_news(&params.ticker.to_uppercase(), STOCK_NEWS_COUNT)
            .await;
        Ok(serde_json::to_value(digest)?)
    }

    fn name(&self) -> &str {
        "search_stock_news"
    }

    fn description(&self) -> &str {
        "Search recent news headlines for a stock. Returns titles with source and date \
         plus short snippets. The list may be empty when no news is available."
    }

    fn parameters(&self) -> Value {
        schema::object(
            json!({ "ticker": schema::string("Stock ticker symbol, e.g. AAPL") }),
            vec!["ticker"],
        )
    }
}

/// Tool returning recent geopolitical and market-risk headlines
pub struct GeopoliticalNewsTool {
    client: Arc<NewsClient>,
}

impl GeopoliticalNewsTool {
    /// Create the tool over a shared news client
    pub fn new(client: Arc<NewsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GeopoliticalNewsTool {
    async fn execute(&self, _params: Value) -> Result<Value> {
        let digest = self
            .client
            .geopolitical_news(GEOPOLITICAL_NEWS_COUNT)
            .await;
        Ok(serde_json::to_value(digest)?)
    }

    fn name(&self) -> &str {
        "search_geopolitical_news"
    }

    fn description(&self) -> &str {
        "Get recent geopolitical and global market-risk headlines. Takes no parameters. \
         The list may be empty when no news is available."
    }

    fn parameters(&self) -> Value {
        schema::object(json!({}), vec![])
    }
}
