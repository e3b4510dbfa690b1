//! Broad-market context collaborator
//!
//! SPY, VIX, and a sector ETF via the Yahoo chart API, plus the CNN
//! fear-and-greed index. Each piece degrades independently so a single
//! failing feed only blanks its own field.

use crate::error::Error;
use serde::Serialize;
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tracing::warn;
use yahoo_finance_api as yahoo;

const FEAR_GREED_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; tickerlens/0.1)";

/// Quote summary for one index or ETF
#[derive(Debug, Clone, Serialize)]
pub struct IndexQuote {
    pub symbol: String,
    pub price: f64,
    /// Percent change over roughly the past month
    pub month_change_pct: Option<f64>,
    pub ma_50_day: Option<f64>,
}

/// Market sentiment reading, 0 (extreme fear) to 100 (extreme greed)
#[derive(Debug, Clone, Serialize)]
pub struct FearGreed {
    pub value: f64,
    pub label: String,
}

/// Broad-market snapshot for the macro analyst
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketSnapshot {
    pub spy: Option<IndexQuote>,
    pub vix: Option<IndexQuote>,
    /// ETF for the analyzed ticker's sector, when the sector maps to one
    pub sector_etf: Option<IndexQuote>,
    pub fear_greed: Option<FearGreed>,
}

/// Client for index quotes and sentiment
pub struct MarketClient {
    http: reqwest::Client,
}

impl MarketClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Market snapshot, with `sector` selecting the sector ETF leg
    pub async fn snapshot(&self, sector: Option<&str>) -> MarketSnapshot {
        let sector_symbol = sector.and_then(sector_etf);

        let (spy, vix, sector_quote, fear_greed) = tokio::join!(
            self.index_quote("SPY"),
            self.index_quote("^VIX"),
            async {
                match sector_symbol {
                    Some(symbol) => self.index_quote(symbol).await,
                    None => None,
                }
            },
            self.fear_greed(),
        );

        MarketSnapshot {
            spy,
            vix,
            sector_etf: sector_quote,
            fear_greed,
        }
    }

    /// Quote for one symbol, degrading to `None` on failure
    pub async fn index_quote(&self, symbol: &str) -> Option<IndexQuote> {
        match fetch_index_quote(symbol).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!(symbol, error = %e, "Index quote fetch failed");
                None
            }
        }
    }

    /// CNN fear-and-greed reading, degrading to `None` on failure
    pub async fn fear_greed(&self) -> Option<FearGreed> {
        match self.fetch_fear_greed().await {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!(error = %e, "Fear & greed fetch failed");
                None
            }
        }
    }

    async fn fetch_fear_greed(&self) -> crate::Result<FearGreed> {
        let body: Value = self
            .http
            .get(FEAR_GREED_URL)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let value = body
            .pointer("/fear_and_greed/score")
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::MarketData("no fear & greed score in response".to_string()))?;

        Ok(FearGreed {
            value,
            label: fear_greed_label(value).to_string(),
        })
    }
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_index_quote(symbol: &str) -> crate::Result<IndexQuote> {
    let provider = yahoo::YahooConnector::new().map_err(|e| Error::MarketData(e.to_string()))?;

    let end = OffsetDateTime::now_utc();
    let start = end - Duration::days(90);
    let response = provider
        .get_quote_history(symbol, start, end)
        .await
        .map_err(|e| Error::MarketData(e.to_string()))?;
    let quotes = response
        .quotes()
        .map_err(|e| Error::MarketData(e.to_string()))?;

    let last = quotes
        .last()
        .ok_or_else(|| Error::MarketData(format!("no quotes for {symbol}")))?;

    let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
    let month_ago = closes.len().checked_sub(22).map(|i| closes[i]);
    let month_change_pct = month_ago
        .filter(|base| *base > 0.0)
        .map(|base| (last.close - base) / base * 100.0);
    let ma_50_day = if closes.len() >= 50 {
        Some(closes[closes.len() - 50..].iter().sum::<f64>() / 50.0)
    } else {
        None
    };

    Ok(IndexQuote {
        symbol: symbol.to_string(),
        price: last.close,
        month_change_pct,
        ma_50_day,
    })
}

/// Sector name to SPDR sector ETF
pub fn sector_etf(sector: &str) -> Option<&'static str> {
    match sector {
        "Technology" => Some("XLK"),
        "Financial Services" => Some("XLF"),
        "Healthcare" => Some("XLV"),
        "Energy" => Some("XLE"),
        "Consumer Cyclical" => Some("XLY"),
        "Consumer Defensive" => Some("XLP"),
        "Industrials" => Some("XLI"),
        "Utilities" => Some("XLU"),
        "Real Estate" => Some("XLRE"),
        "Basic Materials" => Some("XLB"),
        "Communication Services" => Some("XLC"),
        _ => None,
    }
}

/// Band a fear-and-greed score into its label
pub fn fear_greed_label(value: f64) -> &'static str {
    if value <= 24.0 {
        "Extreme Fear"
    } else if value <= 44.0 {
        "Fear"
    } else if value <= 55.0 {
        "Neutral"
    } else if value <= 75.0 {
        "Greed"
    } else {
        "Extreme Greed"
    }
}
