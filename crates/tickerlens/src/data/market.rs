//! Quote, history, and fundamentals lookup
//!
//! Price data comes from the Yahoo Finance chart API via `yahoo_finance_api`;
//! fundamentals come from the quote-summary JSON endpoint over `reqwest`.

use crate::error::{Error, Result};
use crate::models::{PriceHistory, PricePoint};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData,assetProfile";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; tickerlens/0.1)";

/// Price-derived snapshot for the technical analyst
///
/// Every field is nullable; a degraded fetch produces all-`None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TechnicalSnapshot {
    pub ticker: String,
    pub current_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub ma_50_day: Option<f64>,
    pub ma_200_day: Option<f64>,
    pub volume: Option<u64>,
    pub avg_volume: Option<u64>,
    pub ytd_change_pct: Option<f64>,
}

/// Valuation snapshot for the fundamental analyst
#[derive(Debug, Clone, Default, Serialize)]
pub struct FundamentalSnapshot {
    pub ticker: String,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub eps: Option<f64>,
    pub revenue: Option<f64>,
    pub profit_margin: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Client for quotes, history, and fundamentals
pub struct MarketDataClient {
    http: reqwest::Client,
}

impl MarketDataClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Technical snapshot for `ticker`, degrading to empty on failure
    pub async fn technical_snapshot(&self, ticker: &str) -> TechnicalSnapshot {
        match self.fetch_technical(ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(ticker, error = %e, "Technical data fetch failed, returning empty snapshot");
                TechnicalSnapshot {
                    ticker: ticker.to_string(),
                    ..TechnicalSnapshot::default()
                }
            }
        }
    }

    /// Fundamental snapshot for `ticker`, degrading to empty on failure
    pub async fn fundamental_snapshot(&self, ticker: &str) -> FundamentalSnapshot {
        match self.fetch_fundamentals(ticker).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(ticker, error = %e, "Fundamental data fetch failed, returning empty snapshot");
                FundamentalSnapshot {
                    ticker: ticker.to_string(),
                    ..FundamentalSnapshot::default()
                }
            }
        }
    }

    /// Daily price history over `range`, degrading to no points on failure
    pub async fn price_history(&self, ticker: &str, range: &str) -> PriceHistory {
        match self.fetch_history(ticker, range).await {
            Ok(points) => PriceHistory {
                ticker: ticker.to_string(),
                period: range.to_string(),
                points,
            },
            Err(e) => {
                warn!(ticker, range, error = %e, "Price history fetch failed, returning empty history");
                PriceHistory {
                    ticker: ticker.to_string(),
                    period: range.to_string(),
                    points: Vec::new(),
                }
            }
        }
    }

    /// Latest close for `ticker`
    pub async fn latest_close(&self, ticker: &str) -> Result<f64> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| Error::MarketData(e.to_string()))?;
        let response = provider
            .get_latest_quotes(ticker, "1d")
            .await
            .map_err(|e| Error::MarketData(e.to_string()))?;
        let quote = response
            .last_quote()
            .map_err(|e| Error::MarketData(e.to_string()))?;
        Ok(quote.close)
    }

    async fn fetch_history(&self, ticker: &str, range: &str) -> Result<Vec<PricePoint>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| Error::MarketData(e.to_string()))?;

        let end = Utc::now();
        let start = range_start(range, end)?;
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| Error::MarketData(format!("invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| Error::MarketData(format!("invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(ticker, start_odt, end_odt)
            .await
            .map_err(|e| Error::MarketData(e.to_string()))?;
        let quotes = response
            .quotes()
            .map_err(|e| Error::MarketData(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| PricePoint {
                date: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now)
                    .date_naive(),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }

    async fn fetch_technical(&self, ticker: &str) -> Result<TechnicalSnapshot> {
        let points = self.fetch_history(ticker, "1y").await?;
        if points.is_empty() {
            return Err(Error::MarketData(format!("no history for {ticker}")));
        }

        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        let current = *closes.last().unwrap_or(&0.0);

        let year_start = points
            .iter()
            .find(|p| p.date.year() == Utc::now().year())
            .map(|p| p.close);
        let ytd_change_pct = year_start
            .filter(|first| *first > 0.0)
            .map(|first| (current - first) / first * 100.0);

        Ok(TechnicalSnapshot {
            ticker: ticker.to_string(),
            current_price: Some(current),
            fifty_two_week_high: points.iter().map(|p| p.high).fold(None, fold_max),
            fifty_two_week_low: points.iter().map(|p| p.low).fold(None, fold_min),
            ma_50_day: trailing_mean(&closes, 50),
            ma_200_day: trailing_mean(&closes, 200),
            volume: points.last().map(|p| p.volume),
            avg_volume: mean_volume(&points),
            ytd_change_pct,
        })
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot> {
        let url = format!(
            "{QUOTE_SUMMARY_URL}/{ticker}?modules={QUOTE_SUMMARY_MODULES}&formatted=false"
        );
        let body: Value = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = body
            .pointer("/quoteSummary/result/0")
            .ok_or_else(|| Error::MarketData(format!("no quote summary for {ticker}")))?;

        Ok(FundamentalSnapshot {
            ticker: ticker.to_string(),
            market_cap: raw_f64(result, "/summaryDetail/marketCap"),
            pe_ratio: raw_f64(result, "/summaryDetail/trailingPE"),
            forward_pe: raw_f64(result, "/summaryDetail/forwardPE"),
            eps: raw_f64(result, "/defaultKeyStatistics/trailingEps"),
            revenue: raw_f64(result, "/financialData/totalRevenue"),
            profit_margin: raw_f64(result, "/financialData/profitMargins"),
            debt_to_equity: raw_f64(result, "/financialData/debtToEquity"),
            dividend_yield: raw_f64(result, "/summaryDetail/dividendYield"),
            sector: raw_str(result, "/assetProfile/sector"),
            industry: raw_str(result, "/assetProfile/industry"),
        })
    }
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

fn range_start(range: &str, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let start = match range {
        "5d" => end - chrono::Duration::days(5),
        "1mo" => end - chrono::Duration::days(30),
        "3mo" => end - chrono::Duration::days(90),
        "6mo" => end - chrono::Duration::days(180),
        "1y" => end - chrono::Duration::days(365),
        "2y" => end - chrono::Duration::days(730),
        "ytd" => chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .ok_or_else(|| Error::MarketData("invalid year start".to_string()))?,
        other => {
            return Err(Error::MarketData(format!("invalid range: {other}")));
        }
    };
    Ok(start)
}

fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

fn mean_volume(points: &[PricePoint]) -> Option<u64> {
    if points.is_empty() {
        return None;
    }
    let total: u64 = points.iter().map(|p| p.volume).sum();
    Some(total / points.len() as u64)
}

fn fold_max(acc: Option<f64>, value: f64) -> Option<f64> {
    Some(acc.map_or(value, |a| a.max(value)))
}

fn fold_min(acc: Option<f64>, value: f64) -> Option<f64> {
    Some(acc.map_or(value, |a| a.min(value)))
}

fn raw_f64(value: &Value, pointer: &str) -> Option<f64> {
    value.pointer(pointer).and_then(Value::as_f64)
}

fn raw_str(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(String::from)
}
