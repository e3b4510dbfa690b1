//! TickerLens multi-agent stock analysis
//!
//! A natural-language query goes through a fixed pipeline:
//!
//! 1. A router classifies the query into a ticker and four analysis flags
//! 2. Up to four analyst agents (technical, fundamental, news, macro) run
//!    concurrently, each with its own market-data tools
//! 3. An investment synthesizer merges their prose into a structured outlook
//! 4. The sections are aggregated into a markdown report and rendered as a
//!    styled HTML document with an embedded SVG price chart
//!
//! The pipeline reports stage progress over an event channel so a frontend
//! (the CLI animation, for instance) can display live status.

pub mod agents;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod tools;

pub use config::Settings;
pub use error::{Error, Result};
pub use models::{AnalysisState, InvestmentSummary, PriceHistory, PricePoint, RouterDecision};
pub use pipeline::{Analyzer, Stage, StageEvent, StageStatus};
