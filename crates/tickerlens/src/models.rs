//! Core data types threaded through the analysis pipeline

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Routing decision produced once per query
///
/// Deserialized from the router model's JSON reply. Field defaults mirror
/// the router contract: flags off, macro on, unknown ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterDecision {
    /// Uppercase ticker symbol, or `"UNKNOWN"`
    pub ticker: String,

    /// Run the technical analyst
    pub run_technical: bool,

    /// Run the fundamental analyst
    pub run_fundamental: bool,

    /// Run the news analyst
    pub run_news: bool,

    /// Run the macro analyst (on by default)
    pub run_macro: bool,

    /// One-sentence routing rationale
    pub reasoning: String,
}

impl Default for RouterDecision {
    fn default() -> Self {
        Self {
            ticker: "UNKNOWN".to_string(),
            run_technical: false,
            run_fundamental: false,
            run_news: false,
            run_macro: true,
            reasoning: String::new(),
        }
    }
}

impl RouterDecision {
    /// Terminal decision for queries with no identifiable ticker
    ///
    /// All analyses are disabled; the synthesizer short-circuits on it.
    pub fn unknown(reasoning: impl Into<String>) -> Self {
        Self {
            ticker: "UNKNOWN".to_string(),
            run_technical: false,
            run_fundamental: false,
            run_news: false,
            run_macro: false,
            reasoning: reasoning.into(),
        }
    }

    /// Whether no ticker could be identified
    pub fn is_unknown(&self) -> bool {
        self.ticker == "UNKNOWN"
    }
}

/// Mutable state for one query's trip through the pipeline
///
/// Created empty at query start, filled stage by stage, and dropped once
/// the final report has been rendered.
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    /// Original user query
    pub query: String,

    /// Router output
    pub decision: RouterDecision,

    /// Technical analyst prose, when run
    pub technical_analysis: Option<String>,

    /// Fundamental analyst prose, when run
    pub fundamental_analysis: Option<String>,

    /// News analyst prose, when run
    pub news_analysis: Option<String>,

    /// Macro analyst prose, when run
    pub macro_analysis: Option<String>,

    /// Synthesized investment outlook
    pub ai_outlook: Option<String>,

    /// Aggregated markdown report
    pub final_report: String,
}

impl AnalysisState {
    /// Start a fresh state for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Structured fields pulled out of the outlook prose
///
/// Extraction is best effort: any marker the prose lacks leaves its field
/// at `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    /// BUY, HOLD, or SELL
    pub recommendation: String,

    /// High, Medium, or Low
    pub confidence: String,

    /// Price target text as written, e.g. `"$150.00 (+15% from current)"`
    pub price_target: String,

    /// Investment thesis paragraph
    pub thesis: String,
}

impl Default for InvestmentSummary {
    fn default() -> Self {
        Self {
            recommendation: "N/A".to_string(),
            confidence: "N/A".to_string(),
            price_target: "N/A".to_string(),
            thesis: "N/A".to_string(),
        }
    }
}

impl InvestmentSummary {
    /// Extract summary fields from outlook prose
    pub fn parse(outlook: &str) -> Self {
        let mut summary = Self::default();

        if let Ok(re) =
            Regex::new(r"(?i)\*\*Recommendation:\*\*\s*\[?(BUY|HOLD|SELL)\]?(?:\s*\((\w+)\s+Confidence\))?")
        {
            if let Some(caps) = re.captures(outlook) {
                summary.recommendation = caps[1].to_uppercase();
                if let Some(confidence) = caps.get(2) {
                    summary.confidence = capitalize(confidence.as_str());
                }
            }
        }

        if let Ok(re) = Regex::new(r"\*\*Price Target:\*\*\s*(.+)") {
            if let Some(caps) = re.captures(outlook) {
                summary.price_target = caps[1].trim().to_string();
            }
        }

        if let Ok(re) = Regex::new(r"(?s)\*\*Investment Thesis:\*\*\s*(.+)") {
            if let Some(caps) = re.captures(outlook) {
                summary.thesis = caps[1].trim().to_string();
            }
        }

        summary
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// One bar of daily price history
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: chrono::NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Price history snapshot for the report chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    /// Ticker the history belongs to
    pub ticker: String,

    /// Human-readable period label, e.g. `"3mo"`
    pub period: String,

    /// Daily bars in chronological order
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Closing prices in chronological order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Date labels in chronological order
    pub fn dates(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.date.format("%b %d").to_string())
            .collect()
    }
}
