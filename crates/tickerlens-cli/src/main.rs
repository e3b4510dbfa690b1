//! TickerLens command line
//!
//! `tickerlens "should I buy Apple?"` runs the analysis pipeline behind a
//! full-screen terminal animation, writes the HTML report, and opens it in
//! the default browser. `--quiet` prints a plain summary instead.

mod animation;

use anyhow::{Context, anyhow};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tickerlens::pipeline::Progress;
use tickerlens::report;
use tickerlens::{AnalysisState, Analyzer, InvestmentSummary, Settings};
use tickerlens_llm::{ChatProvider, OpenAiClient, OpenAiConfig};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Symbols shown on the animation ticker tape
const TAPE_SYMBOLS: [&str; 8] = [
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "TSLA", "META", "SPY",
];

#[derive(Debug, Parser)]
#[command(
    name = "tickerlens",
    version,
    about = "Multi-agent stock analysis with an HTML report"
)]
struct Args {
    /// Free-text query, e.g. "should I buy Apple?"
    query: String,

    /// Print a plain-text summary; no animation, no browser
    #[arg(short, long)]
    quiet: bool,

    /// Skip the terminal animation but still write and open the report
    #[arg(long)]
    no_anim: bool,

    /// Path to the YAML settings file
    #[arg(short, long, default_value = "tickerlens.yaml")]
    config: PathBuf,

    /// Override the reports output directory
    #[arg(short, long)]
    output_dir: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.quiet || args.no_anim);

    let mut settings = Settings::load(&args.config)?;
    if let Some(dir) = &args.output_dir {
        settings.reports_dir = dir.clone();
    }

    let api_key = settings.resolve_api_key()?;
    let mut llm_config = OpenAiConfig::new(api_key);
    if let Some(base) = &settings.llm.api_base {
        llm_config = llm_config.with_api_base(base.clone());
    }
    let provider: Arc<dyn ChatProvider> = Arc::new(OpenAiClient::with_config(llm_config)?);
    let analyzer = Arc::new(Analyzer::new(settings.clone(), provider));

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    let state = if args.quiet || args.no_anim {
        runtime.block_on(analyzer.run(&args.query, &Progress::none()))?
    } else {
        run_with_animation(runtime, Arc::clone(&analyzer), args.query.clone())?
    };

    // One small runtime for the chart fetch when the big one moved into the worker
    let chart_runtime = tokio::runtime::Runtime::new()?;
    let report_path = render_report(&chart_runtime, &analyzer, &state, &settings)?;

    if args.quiet {
        print_summary(&state, report_path.as_deref());
    } else {
        if let Some(path) = &report_path {
            println!("Report written to {}", path.display());
            open_in_browser(path);
        }
        println!("{}", state.decision.reasoning);
    }

    Ok(())
}

/// Animation owns the main thread; the pipeline runs on a worker thread
fn run_with_animation(
    runtime: tokio::runtime::Runtime,
    analyzer: Arc<Analyzer>,
    query: String,
) -> anyhow::Result<AnalysisState> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = Progress::new(tx);
    let done = Arc::new(AtomicBool::new(false));

    let tape = runtime.block_on(fetch_tape());

    let worker_done = Arc::clone(&done);
    let handle = std::thread::spawn(move || {
        let result = runtime.block_on(analyzer.run(&query, &progress));
        worker_done.store(true, Ordering::SeqCst);
        result
    });

    // Render failures must not abort the analysis
    if let Err(e) = animation::run(rx, tape, Arc::clone(&done)) {
        warn!(error = %e, "Animation failed, waiting for analysis headless");
    }

    let state = handle
        .join()
        .map_err(|_| anyhow!("analysis thread panicked"))??;
    Ok(state)
}

/// Pre-fetch tape prices, degrading each symbol independently
async fn fetch_tape() -> Vec<animation::TapeEntry> {
    let client = tickerlens::data::MarketDataClient::new();
    let fetches = TAPE_SYMBOLS.iter().map(|symbol| {
        let client = &client;
        async move {
            let price = tokio::time::timeout(
                std::time::Duration::from_secs(3),
                client.latest_close(symbol),
            )
            .await
            .ok()
            .and_then(Result::ok);
            animation::TapeEntry {
                symbol: (*symbol).to_string(),
                price,
            }
        }
    });
    futures::future::join_all(fetches).await
}

/// Parse the markdown report, fetch the chart, render and save the HTML
fn render_report(
    runtime: &tokio::runtime::Runtime,
    analyzer: &Analyzer,
    state: &AnalysisState,
    settings: &Settings,
) -> anyhow::Result<Option<PathBuf>> {
    let parsed = report::parse(&state.final_report);
    let summary = state
        .ai_outlook
        .as_deref()
        .map(InvestmentSummary::parse)
        .unwrap_or_default();

    let chart_svg = if state.decision.is_unknown() {
        String::new()
    } else {
        let history = runtime.block_on(analyzer.price_history(&state.decision.ticker));
        report::chart::render(&history)
    };

    let html = report::html::render_document(&parsed, &summary, &chart_svg, "3mo");
    let path = report::html::save_report(&settings.reports_dir, &parsed.ticker, &html)?;
    Ok(Some(path))
}

fn print_summary(state: &AnalysisState, report_path: Option<&std::path::Path>) {
    let summary = state
        .ai_outlook
        .as_deref()
        .map(InvestmentSummary::parse)
        .unwrap_or_default();

    println!("Ticker:         {}", state.decision.ticker);
    println!("Recommendation: {}", summary.recommendation);
    println!("Confidence:     {}", summary.confidence);
    println!("Price target:   {}", summary.price_target);
    println!("Thesis:         {}", summary.thesis);
    if let Some(path) = report_path {
        println!("Report:         {}", path.display());
    }
}

/// Open the report with the platform opener; failure is only a warning
fn open_in_browser(path: &std::path::Path) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    if let Err(e) = std::process::Command::new(opener).arg(path).spawn() {
        warn!(error = %e, "Could not open the report in a browser");
    }
}

fn init_tracing(verbose_ok: bool) {
    // Logs would tear the animation frames; keep them to errors unless the
    // user asked for more via RUST_LOG
    let default_filter = if verbose_ok { "info" } else { "error" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
