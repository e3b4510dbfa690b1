//! End-to-end pipeline tests with a scripted chat provider
//!
//! The provider answers by inspecting the system prompt of each request, so
//! the concurrent analyst fan-out gets deterministic replies regardless of
//! scheduling order. No network or real model is involved.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tickerlens::pipeline::{Progress, Stage, StageEvent, StageStatus};
use tickerlens::{Analyzer, Settings};
use tickerlens_llm::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, FinishReason, LlmError, Role, TokenUsage,
};

/// Answers each request by keyword-matching its system prompt
struct RoleplayProvider {
    calls: AtomicUsize,
    fail_router: bool,
    fail_analyst: bool,
}

impl RoleplayProvider {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_router: false,
            fail_analyst: false,
        }
    }

    fn with_failing_router() -> Self {
        Self {
            fail_router: true,
            ..Self::new()
        }
    }

    fn with_failing_analyst() -> Self {
        Self {
            fail_analyst: true,
            ..Self::new()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for RoleplayProvider {
    async fn chat(&self, request: ChatRequest) -> tickerlens_llm::Result<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let system = request
            .messages
            .iter()
            .find(|m| m.role == Role::System)
            .and_then(|m| m.text())
            .unwrap_or_default();

        let reply = if system.contains("query router") {
            if self.fail_router {
                return Err(LlmError::RequestFailed("scripted router failure".into()));
            }
            r#"{"ticker": "AAPL", "run_technical": true, "run_fundamental": false,
                "run_news": false, "run_macro": false,
                "reasoning": "Chart question is purely technical"}"#
        } else if system.contains("technical analyst") {
            if self.fail_analyst {
                return Err(LlmError::RequestFailed("scripted analyst failure".into()));
            }
            "Price sits above both the 50-day and 200-day moving averages. Trend: bullish."
        } else if system.contains("senior investment analyst") {
            "**Recommendation:** BUY (High Confidence)\n\n\
             **Price Target:** $250 (+8% from current)\n\n\
             **Risk Assessment:** MEDIUM\nKey Risks:\n1. Multiple compression\n\
             2. Slowing buybacks\n3. Regulatory pressure\n\n\
             **Investment Thesis:** The uptrend is intact and momentum favors longs."
        } else {
            return Err(LlmError::RequestFailed(format!(
                "unexpected system prompt: {system}"
            )));
        };

        Ok(ChatResponse {
            message: ChatMessage::assistant(reply),
            finish: FinishReason::Stop,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &str {
        "roleplay"
    }
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<StageEvent>) -> Vec<StageEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn statuses_for(events: &[StageEvent], stage: Stage) -> Vec<StageStatus> {
    events
        .iter()
        .filter(|e| e.stage == stage)
        .map(|e| e.status)
        .collect()
}

#[tokio::test]
async fn test_technical_only_query_produces_report() {
    let provider = Arc::new(RoleplayProvider::new());
    let analyzer = Analyzer::new(
        Settings::default(),
        Arc::clone(&provider) as Arc<dyn ChatProvider>,
    );

    let state = analyzer
        .run("What do AAPL charts look like?", &Progress::none())
        .await
        .unwrap();

    assert_eq!(state.decision.ticker, "AAPL");
    assert!(state.technical_analysis.is_some());
    assert!(state.fundamental_analysis.is_none());
    assert!(state.news_analysis.is_none());
    assert!(state.macro_analysis.is_none());

    let report = &state.final_report;
    assert!(report.starts_with("# Stock Analysis Report: AAPL"));
    assert!(report.contains("## Technical Analysis"));
    assert!(report.contains("## AI Investment Outlook"));
    assert!(!report.contains("## Fundamental Analysis"));
    assert!(!report.contains("## News & Sentiment Analysis"));
    assert!(!report.contains("## Macro Analysis"));
    assert!(report.trim_end().ends_with("*Generated by TickerLens*"));

    // Router, one analyst, synthesizer
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn test_report_round_trips_through_parser() {
    let provider = Arc::new(RoleplayProvider::new());
    let analyzer = Analyzer::new(Settings::default(), provider as Arc<dyn ChatProvider>);

    let state = analyzer
        .run("What do AAPL charts look like?", &Progress::none())
        .await
        .unwrap();

    let parsed = tickerlens::report::parse(&state.final_report);
    assert_eq!(parsed.ticker, "AAPL");
    let titles: Vec<&str> = parsed.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Technical Analysis", "AI Investment Outlook"]);
    assert!(parsed.sections[0].body.contains("bullish"));
}

#[tokio::test]
async fn test_router_failure_degrades_to_unknown() {
    let provider = Arc::new(RoleplayProvider::with_failing_router());
    let analyzer = Analyzer::new(
        Settings::default(),
        Arc::clone(&provider) as Arc<dyn ChatProvider>,
    );

    let state = analyzer
        .run("tell me a joke", &Progress::none())
        .await
        .unwrap();

    assert!(state.decision.is_unknown());
    assert!(!state.decision.run_technical);
    assert!(!state.decision.run_macro);
    assert!(state.technical_analysis.is_none());

    // The canned outlook comes back without any further model calls
    let outlook = state.ai_outlook.as_deref().unwrap();
    assert!(outlook.contains("HOLD (Low Confidence)"));
    assert_eq!(provider.call_count(), 1);

    assert!(state.final_report.contains("# Stock Analysis Report: UNKNOWN"));
    assert!(state.final_report.contains("## AI Investment Outlook"));
}

#[tokio::test]
async fn test_stage_events_cover_every_stage() {
    let provider = Arc::new(RoleplayProvider::new());
    let analyzer = Analyzer::new(Settings::default(), provider as Arc<dyn ChatProvider>);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    analyzer
        .run("What do AAPL charts look like?", &Progress::new(tx))
        .await
        .unwrap();

    let events = drain(&mut rx);

    assert_eq!(
        statuses_for(&events, Stage::Router),
        vec![StageStatus::Running, StageStatus::Done]
    );
    assert_eq!(
        statuses_for(&events, Stage::Technical),
        vec![StageStatus::Running, StageStatus::Done]
    );
    for stage in [Stage::Fundamental, Stage::News, Stage::Macro] {
        assert_eq!(statuses_for(&events, stage), vec![StageStatus::Skipped]);
    }
    assert_eq!(
        statuses_for(&events, Stage::Investment),
        vec![StageStatus::Running, StageStatus::Done]
    );

    // Router finishes before any analyst starts
    let router_done = events
        .iter()
        .position(|e| e.stage == Stage::Router && e.status == StageStatus::Done)
        .unwrap();
    let first_analyst = events
        .iter()
        .position(|e| e.stage != Stage::Router)
        .unwrap();
    assert!(router_done < first_analyst);
}

#[tokio::test]
async fn test_failed_analyst_stage_is_never_marked_done() {
    let provider = Arc::new(RoleplayProvider::with_failing_analyst());
    let analyzer = Analyzer::new(Settings::default(), provider as Arc<dyn ChatProvider>);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let result = analyzer
        .run("What do AAPL charts look like?", &Progress::new(tx))
        .await;
    assert!(result.is_err());

    let events = drain(&mut rx);
    // The failed stage started but must not report success
    assert_eq!(
        statuses_for(&events, Stage::Technical),
        vec![StageStatus::Running]
    );
}

#[tokio::test]
async fn test_unknown_query_emits_all_analysts_skipped() {
    let provider = Arc::new(RoleplayProvider::with_failing_router());
    let analyzer = Analyzer::new(Settings::default(), provider as Arc<dyn ChatProvider>);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    analyzer
        .run("tell me a joke", &Progress::new(tx))
        .await
        .unwrap();

    let events = drain(&mut rx);
    for stage in [Stage::Technical, Stage::Fundamental, Stage::News, Stage::Macro] {
        assert_eq!(statuses_for(&events, stage), vec![StageStatus::Skipped]);
    }
    // Synthesis still runs (it returns the canned outlook)
    assert_eq!(
        statuses_for(&events, Stage::Investment),
        vec![StageStatus::Running, StageStatus::Done]
    );
}
