//! Headline search collaborator
//!
//! Uses the Yahoo Finance search endpoint, which returns recent news items
//! for a free-text query. Snippets are cleaned and capped so tool output
//! stays small.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; tickerlens/0.1)";
const MAX_SNIPPET_CHARS: usize = 280;

/// One search hit
#[derive(Debug, Clone, Serialize)]
pub struct Headline {
    /// Article title
    pub title: String,

    /// Publisher name, when known
    pub source: Option<String>,

    /// Publication date (YYYY-MM-DD), when known
    pub date: Option<String>,

    /// Cleaned summary text, capped at 280 characters
    pub snippet: String,
}

/// Headlines returned for one query
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsDigest {
    /// Search query that produced these headlines
    pub query: String,

    /// Headlines, most recent first as returned by the provider
    pub headlines: Vec<Headline>,
}

/// News search client
pub struct NewsClient {
    http: reqwest::Client,
}

impl NewsClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Recent news for a ticker, degrading to an empty digest on failure
    pub async fn stock_news(&self, ticker: &str, count: usize) -> NewsDigest {
        let query = format!("{ticker} stock news");
        self.search(&query, count).await
    }

    /// Recent geopolitical/market-risk headlines
    pub async fn geopolitical_news(&self, count: usize) -> NewsDigest {
        self.search("geopolitical risk global markets", count).await
    }

    /// Free-text headline search, degrading to an empty digest on failure
    pub async fn search(&self, query: &str, count: usize) -> NewsDigest {
        match self.fetch(query, count).await {
            Ok(headlines) => NewsDigest {
                query: query.to_string(),
                headlines,
            },
            Err(e) => {
                warn!(query, error = %e, "News search failed, returning empty digest");
                NewsDigest {
                    query: query.to_string(),
                    headlines: Vec::new(),
                }
            }
        }
    }

    async fn fetch(&self, query: &str, count: usize) -> crate::Result<Vec<Headline>> {
        let body: Value = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("newsCount", &count.to_string()),
                ("quotesCount", "0"),
            ])
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let items = body
            .get("news")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(items
            .iter()
            .take(count)
            .filter_map(parse_item)
            .collect())
    }
}

impl Default for NewsClient {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_item(item: &Value) -> Option<Headline> {
    let title = item.get("title").and_then(Value::as_str)?.to_string();
    let source = item
        .get("publisher")
        .and_then(Value::as_str)
        .map(String::from);
    let date = item
        .get("providerPublishTime")
        .and_then(Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string());
    let snippet = item
        .get("summary")
        .and_then(Value::as_str)
        .map_or_else(String::new, clean_snippet);

    Some(Headline {
        title,
        source,
        date,
        snippet,
    })
}

/// Collapse whitespace and cap length
fn clean_snippet(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SNIPPET_CHARS {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(MAX_SNIPPET_CHARS - 3).collect();
    format!("{truncated}...")
}
