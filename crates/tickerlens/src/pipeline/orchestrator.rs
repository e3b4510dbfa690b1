//! Pipeline orchestrator
//!
//! Owns the injected settings and provider, builds the agents, and drives
//! one query through router, analyst fan-out, synthesis, and aggregation.

use super::events::{Progress, Stage};
use crate::agents::{Analyst, AnalystKind, DataClients, InvestmentSynthesizer, Router};
use crate::models::{AnalysisState, PriceHistory};
use crate::report;
use crate::{Result, Settings};
use std::sync::Arc;
use tickerlens_llm::ChatProvider;
use tracing::{info, warn};

/// Period of price history embedded in the report chart
const CHART_RANGE: &str = "3mo";

/// Runs the full analysis pipeline for one query at a time
pub struct Analyzer {
    settings: Settings,
    provider: Arc<dyn ChatProvider>,
    clients: DataClients,
}

impl Analyzer {
    /// Create an analyzer with injected settings and provider
    pub fn new(settings: Settings, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            settings,
            provider,
            clients: DataClients::new(),
        }
    }

    /// The settings this analyzer was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the pipeline for a query
    ///
    /// Progress is reported over `progress`; pass [`Progress::none`] for
    /// headless runs. The returned state carries every analyst's prose,
    /// the outlook, and the aggregated markdown report.
    pub async fn run(&self, query: &str, progress: &Progress) -> Result<AnalysisState> {
        info!(query, "Analysis started");
        let mut state = AnalysisState::new(query);

        progress.running(Stage::Router);
        let router = Router::new(Arc::clone(&self.provider), &self.settings);
        state.decision = router.route(query).await;
        progress.done(Stage::Router);

        let ticker = state.decision.ticker.clone();
        let (technical, fundamental, news, macro_) = tokio::join!(
            self.run_analyst(
                AnalystKind::Technical,
                Stage::Technical,
                state.decision.run_technical,
                &ticker,
                progress,
            ),
            self.run_analyst(
                AnalystKind::Fundamental,
                Stage::Fundamental,
                state.decision.run_fundamental,
                &ticker,
                progress,
            ),
            self.run_analyst(
                AnalystKind::News,
                Stage::News,
                state.decision.run_news,
                &ticker,
                progress,
            ),
            self.run_analyst(
                AnalystKind::Macro,
                Stage::Macro,
                state.decision.run_macro,
                &ticker,
                progress,
            ),
        );
        state.technical_analysis = technical?;
        state.fundamental_analysis = fundamental?;
        state.news_analysis = news?;
        state.macro_analysis = macro_?;

        progress.running(Stage::Investment);
        let synthesizer = InvestmentSynthesizer::new(Arc::clone(&self.provider), &self.settings);
        state.ai_outlook = Some(synthesizer.synthesize(&state).await?);
        progress.done(Stage::Investment);

        state.final_report = report::markdown::aggregate(&state);
        info!(
            ticker = %state.decision.ticker,
            report_chars = state.final_report.len(),
            "Analysis complete"
        );
        Ok(state)
    }

    /// Price history for the report chart, degraded to empty on failure
    pub async fn price_history(&self, ticker: &str) -> PriceHistory {
        self.clients
            .market_data
            .price_history(ticker, CHART_RANGE)
            .await
    }

    async fn run_analyst(
        &self,
        kind: AnalystKind,
        stage: Stage,
        enabled: bool,
        ticker: &str,
        progress: &Progress,
    ) -> Result<Option<String>> {
        if !enabled {
            progress.skipped(stage);
            return Ok(None);
        }

        progress.running(stage);
        let analyst = Analyst::new(
            kind,
            Arc::clone(&self.provider),
            &self.settings,
            &self.clients,
        );

        match analyst.analyze(ticker).await {
            Ok(text) => {
                progress.done(stage);
                Ok(Some(text))
            }
            Err(e) => {
                // Leave the stage at Running; the run is about to error out
                warn!(analyst = kind.name(), error = %e, "Analyst failed");
                Err(e)
            }
        }
    }
}
