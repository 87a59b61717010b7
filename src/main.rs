mod analysis;
mod config;
mod error;
mod indicator;
mod llm;
mod market_data;
mod model;
mod report;

use std::path::Path;

use chrono::{Duration, Utc};
use clap::Parser;
use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use error::ConfigError;
use llm::TextGenerator;
use llm::openrouter::OpenRouterClient;
use market_data::MarketData;
use market_data::yahoo::YahooMarketData;
use model::Recommendation;
use report::{Reporter, TerminalReporter};

#[derive(Debug, Display, Error)]
pub enum AppError {
    #[display("configuration error")]
    Config,
    #[display("text-generation client error")]
    Llm,
}

#[derive(Parser)]
#[command(name = "stock-advisor", about = "LLM-assisted technical analysis advisor")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Report<AppError>> {
    let cli = Cli::parse();
    let config = config::load(Path::new(&cli.config)).change_context(AppError::Config)?;

    init_tracing(&config);

    let specs = config.indicator_specs().change_context(AppError::Config)?;
    if specs.is_empty() {
        warn!("no indicators configured; prompts will carry an empty summary");
    }

    let provider = build_provider(&config).change_context(AppError::Config)?;
    let generator: Box<dyn TextGenerator> = Box::new(
        OpenRouterClient::from_config(&config.llm).change_context(AppError::Llm)?,
    );
    let reporter = TerminalReporter;

    let end = Utc::now();
    let start = end - Duration::days(config.general.lookback_days);

    // Sequential per-ticker fold; a failed ticker records an Error-sentinel
    // row so the summary always covers the whole batch.
    let mut rows: Vec<(String, Recommendation)> = Vec::new();
    for symbol in &config.tickers {
        info!(symbol = %symbol, provider = provider.provider(), "analyzing ticker");

        let bars = match provider.fetch_daily(symbol, start, end).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(symbol = %symbol, error = ?e, "price history fetch failed (continuing)");
                let recommendation = Recommendation::error(format!(
                    "price history unavailable: {}",
                    e.current_context()
                ));
                reporter.ticker_analysis(symbol, &recommendation);
                rows.push((symbol.clone(), recommendation));
                continue;
            }
        };

        let indicators = indicator::compute(&bars, &specs);
        info!(
            symbol = %symbol,
            bars = bars.len(),
            indicators = indicators.entries().len(),
            "indicators computed"
        );

        let recommendation = analysis::recommend(generator.as_ref(), symbol, &indicators).await;

        reporter.ticker_analysis(symbol, &recommendation);
        rows.push((symbol.clone(), recommendation));
    }

    reporter.summary(&rows);
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::new(&config.general.log_level);
    match config.general.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn MarketData>, Report<ConfigError>> {
    match config.market_data.provider.as_str() {
        "yahoo" => Ok(match &config.market_data.base_url {
            Some(url) => Box::new(YahooMarketData::with_base_url(url)),
            None => Box::new(YahooMarketData::new()),
        }),
        other => Err(Report::new(ConfigError::Validation {
            field: format!("market_data.provider \"{other}\" is not supported"),
        })),
    }
}
