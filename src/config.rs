use std::path::Path;

use error_stack::{Report, ResultExt};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::indicator::IndicatorSpec;

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "text".into()
}

fn default_lookback_days() -> i64 {
    365
}

fn default_provider() -> String {
    "yahoo".into()
}

fn default_llm_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".into()
}

fn default_llm_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Accepted values: `"text"` | `"json"`
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Daily-candle history window fetched per ticker.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarketDataConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Override for tests; the provider default is used when absent.
    pub base_url: Option<String>,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndicatorConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: toml::Table,
}

impl AppConfig {
    /// Parse every configured indicator into a validated spec, in config
    /// order. Unknown types and malformed parameters fail here, before any
    /// data is fetched.
    pub fn indicator_specs(&self) -> Result<Vec<IndicatorSpec>, Report<ConfigError>> {
        self.indicators
            .iter()
            .enumerate()
            .map(|(i, indicator)| {
                IndicatorSpec::parse(&indicator.kind, &indicator.params).change_context_lazy(
                    || ConfigError::Validation {
                        field: format!("indicators[{i}] (type \"{}\")", indicator.kind),
                    },
                )
            })
            .collect()
    }
}

/// Load and validate an `AppConfig` from a TOML file at `path`.
pub fn load(path: &Path) -> Result<AppConfig, Report<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .change_context(ConfigError::ReadFile)
        .attach_with(|| format!("path: {}", path.display()))?;

    let config: AppConfig = toml::from_str(&content).change_context(ConfigError::Parse {
        reason: "invalid TOML syntax or schema mismatch".into(),
    })?;

    validate(&config)?;

    Ok(config)
}

const VALID_LOG_FORMATS: &[&str] = &["text", "json"];
const VALID_PROVIDERS: &[&str] = &["yahoo"];

fn validate(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    validate_general(config)?;
    validate_provider(config)?;
    validate_tickers(config)?;
    config.indicator_specs()?;
    Ok(())
}

fn validate_general(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "general.log_format \"{}\" is not valid",
                config.general.log_format
            ),
        }));
    }
    if config.general.lookback_days < 1 {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "general.lookback_days must be >= 1, got {}",
                config.general.lookback_days
            ),
        }));
    }
    Ok(())
}

fn validate_provider(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if !VALID_PROVIDERS.contains(&config.market_data.provider.as_str()) {
        return Err(Report::new(ConfigError::Validation {
            field: format!(
                "market_data.provider \"{}\" is not supported",
                config.market_data.provider
            ),
        }));
    }
    Ok(())
}

fn validate_tickers(config: &AppConfig) -> Result<(), Report<ConfigError>> {
    if config.tickers.is_empty() {
        return Err(Report::new(ConfigError::Validation {
            field: "tickers: at least one ticker is required".into(),
        }));
    }

    let mut seen = std::collections::HashSet::new();
    for ticker in &config.tickers {
        if ticker.trim().is_empty() {
            return Err(Report::new(ConfigError::Validation {
                field: "tickers: blank ticker symbol".into(),
            }));
        }
        if !seen.insert(ticker.as_str()) {
            return Err(Report::new(ConfigError::Validation {
                field: format!("tickers: duplicate symbol \"{ticker}\""),
            }));
        }
    }
    Ok(())
}
