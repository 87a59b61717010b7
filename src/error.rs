use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("failed to read config file")]
    ReadFile,
    #[display("failed to parse config: {reason}")]
    Parse { reason: String },
    #[display("invalid config: {field}")]
    Validation { field: String },
}

#[derive(Debug, Display, Error)]
pub enum IndicatorError {
    #[display("unknown indicator type: {name}")]
    UnknownIndicator { name: String },
    #[display("invalid parameter: {name}")]
    InvalidParameter { name: String },
}

#[derive(Debug, Display, Error)]
pub enum MarketDataError {
    #[display("request to {provider} failed")]
    Request { provider: String },
    #[display("{provider} returned HTTP {status}")]
    Http { provider: String, status: u16 },
    #[display("failed to parse response from {provider}")]
    ResponseParse { provider: String },
    #[display("no price data for {symbol}")]
    NoData { symbol: String },
}

#[derive(Debug, Display, Error)]
pub enum LlmError {
    #[display("API key environment variable {var} is not set")]
    MissingApiKey { var: String },
    #[display("request to text-generation service failed")]
    Request,
    #[display("text-generation service returned HTTP {status}")]
    Http { status: u16 },
    #[display("failed to parse text-generation response")]
    ResponseParse,
    #[display("text-generation response contained no choices")]
    EmptyResponse,
}
