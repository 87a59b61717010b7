use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A single daily price bar.
///
/// Series are always ordered by strictly increasing timestamp (oldest first)
/// and are never mutated after fetch.
#[derive(Debug, Clone)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    // Not read by any current indicator
    #[allow(dead_code)]
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trading action label produced by the analysis step.
///
/// `Error` is a failure sentinel, never a genuine signal; callers must treat
/// it as "recommendation unavailable".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StrongBuy,
    Buy,
    WeakBuy,
    Hold,
    WeakSell,
    Sell,
    StrongSell,
    Error,
}

impl Action {
    /// Parse one of the seven trading labels.
    ///
    /// `"Error"` is deliberately not parseable: the sentinel can only be
    /// constructed locally, never injected by the model response.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Strong Buy" => Some(Self::StrongBuy),
            "Buy" => Some(Self::Buy),
            "Weak Buy" => Some(Self::WeakBuy),
            "Hold" => Some(Self::Hold),
            "Weak Sell" => Some(Self::WeakSell),
            "Sell" => Some(Self::Sell),
            "Strong Sell" => Some(Self::StrongSell),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::WeakBuy => "Weak Buy",
            Self::Hold => "Hold",
            Self::WeakSell => "Weak Sell",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured recommendation for one instrument.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub action: Action,
    pub justification: String,
}

impl Recommendation {
    /// Build the `Error`-sentinel result used for every failure mode.
    pub fn error(justification: impl Into<String>) -> Self {
        Self {
            action: Action::Error,
            justification: justification.into(),
        }
    }
}

/// Numeric output of one computed indicator.
///
/// Every series holds exactly one value per input bar; warm-up positions are
/// `f64::NAN`.
#[derive(Debug, Clone)]
pub enum SeriesData {
    Series(Vec<f64>),
    Bands {
        upper: Vec<f64>,
        lower: Vec<f64>,
    },
    MacdLines {
        macd: Vec<f64>,
        signal: Vec<f64>,
        fast: usize,
        slow: usize,
        signal_period: usize,
    },
}

/// One computed indicator keyed by its display name (e.g. `"SMA_20"`).
#[derive(Debug, Clone)]
pub struct IndicatorEntry {
    pub key: String,
    pub data: SeriesData,
}

/// Ordered collection of computed indicators for one instrument.
///
/// Entries keep the submission order of the specs that produced them, and
/// duplicate specs stay as independent entries: this is a list, not a map.
#[derive(Debug, Clone, Default)]
pub struct IndicatorResult {
    entries: Vec<IndicatorEntry>,
}

impl IndicatorResult {
    pub fn push(&mut self, key: String, data: SeriesData) {
        self.entries.push(IndicatorEntry { key, data });
    }

    pub fn entries(&self) -> &[IndicatorEntry] {
        &self.entries
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given key, if any.
    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&SeriesData> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.data)
    }

    /// Render the summary as a deterministic JSON object.
    ///
    /// Entries are emitted in submission order with full numeric precision;
    /// non-finite values become `null` and duplicate keys are emitted twice.
    /// Keys are engine-generated (`[A-Za-z0-9_]`) so no escaping is needed.
    pub fn to_json(&self) -> String {
        let mut out = String::from("{");
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('"');
            out.push_str(&entry.key);
            out.push_str("\":");
            out.push_str(&entry_value(&entry.data).to_string());
        }
        out.push('}');
        out
    }
}

fn entry_value(data: &SeriesData) -> Value {
    match data {
        SeriesData::Series(values) => series_value(values),
        SeriesData::Bands { upper, lower } => serde_json::json!({
            "upper_band": series_value(upper),
            "lower_band": series_value(lower),
        }),
        SeriesData::MacdLines {
            macd,
            signal,
            fast,
            slow,
            signal_period,
        } => serde_json::json!({
            "macd": series_value(macd),
            "signal": series_value(signal),
            "params": { "fast": fast, "slow": slow, "signal": signal_period },
        }),
    }
}

fn series_value(values: &[f64]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|&v| match serde_json::Number::from_f64(v) {
                Some(n) => Value::Number(n),
                None => Value::Null,
            })
            .collect(),
    )
}
