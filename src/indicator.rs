pub mod bollinger;
pub mod cci;
pub mod ma;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod vwap;

use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::model::{Bar, IndicatorResult, SeriesData};

const DEFAULT_PERIOD: usize = 20;
const DEFAULT_RSI_PERIOD: usize = 14;
const DEFAULT_ROC_PERIOD: usize = 12;
const DEFAULT_MACD_FAST: usize = 12;
const DEFAULT_MACD_SLOW: usize = 26;
const DEFAULT_MACD_SIGNAL: usize = 9;

/// A self-contained request for one indicator computation.
///
/// Unknown indicator types and malformed parameters are rejected here, at
/// construction time; `compute` never sees an invalid spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorSpec {
    Sma { period: usize },
    Ema { period: usize },
    BollingerBands { period: usize },
    Vwap,
    Rsi { period: usize },
    Macd { fast: usize, slow: usize, signal: usize },
    Roc { period: usize },
    Cci { period: usize },
}

impl IndicatorSpec {
    /// Build a spec from its config form: a type name plus a parameter table.
    ///
    /// Missing parameters take conventional defaults; parameters that are
    /// present but not positive integers are rejected.
    pub fn parse(name: &str, params: &toml::Table) -> Result<Self, Report<IndicatorError>> {
        match name {
            "SMA" => Ok(Self::Sma {
                period: period_param(params, "period", DEFAULT_PERIOD)?,
            }),
            "EMA" => Ok(Self::Ema {
                period: period_param(params, "period", DEFAULT_PERIOD)?,
            }),
            "BollingerBands" => Ok(Self::BollingerBands {
                period: period_param(params, "period", DEFAULT_PERIOD)?,
            }),
            "VWAP" => Ok(Self::Vwap),
            "RSI" => Ok(Self::Rsi {
                period: period_param(params, "period", DEFAULT_RSI_PERIOD)?,
            }),
            "MACD" => Ok(Self::Macd {
                fast: period_param(params, "fast", DEFAULT_MACD_FAST)?,
                slow: period_param(params, "slow", DEFAULT_MACD_SLOW)?,
                signal: period_param(params, "signal", DEFAULT_MACD_SIGNAL)?,
            }),
            "ROC" => Ok(Self::Roc {
                period: period_param(params, "period", DEFAULT_ROC_PERIOD)?,
            }),
            "CCI" => Ok(Self::Cci {
                period: period_param(params, "period", DEFAULT_PERIOD)?,
            }),
            other => bail!(IndicatorError::UnknownIndicator { name: other.into() }),
        }
    }

    /// Display key used in the indicator summary (e.g. `"SMA_20"`).
    pub fn key(&self) -> String {
        match self {
            Self::Sma { period } => format!("SMA_{period}"),
            Self::Ema { period } => format!("EMA_{period}"),
            Self::BollingerBands { period } => format!("Bollinger_Bands_{period}"),
            Self::Vwap => "VWAP".into(),
            Self::Rsi { period } => format!("RSI_{period}"),
            Self::Macd { .. } => "MACD".into(),
            Self::Roc { period } => format!("ROC_{period}"),
            Self::Cci { period } => format!("CCI_{period}"),
        }
    }
}

fn period_param(
    params: &toml::Table,
    key: &str,
    default: usize,
) -> Result<usize, Report<IndicatorError>> {
    match params.get(key) {
        None => Ok(default),
        Some(value) => match value.as_integer() {
            Some(n) if n >= 1 => Ok(n as usize),
            _ => bail!(IndicatorError::InvalidParameter {
                name: format!("{key} must be an integer >= 1"),
            }),
        },
    }
}

/// Compute every requested indicator over `bars` (oldest first).
///
/// Infallible by construction: short or empty series surface as NaN-bearing
/// (or empty) output, never as an error. Each spec contributes one entry in
/// submission order; duplicates are computed independently.
pub fn compute(bars: &[Bar], specs: &[IndicatorSpec]) -> IndicatorResult {
    let closes = close_prices(bars);
    let mut result = IndicatorResult::default();

    for spec in specs {
        let data = match spec {
            IndicatorSpec::Sma { period } => SeriesData::Series(ma::sma(&closes, *period)),
            IndicatorSpec::Ema { period } => SeriesData::Series(ma::ema(&closes, *period)),
            IndicatorSpec::BollingerBands { period } => {
                let bands = bollinger::bands(&closes, *period);
                SeriesData::Bands {
                    upper: bands.upper,
                    lower: bands.lower,
                }
            }
            IndicatorSpec::Vwap => SeriesData::Series(vwap::vwap(bars)),
            IndicatorSpec::Rsi { period } => SeriesData::Series(rsi::rsi(&closes, *period)),
            IndicatorSpec::Macd { fast, slow, signal } => {
                let lines = macd::lines(&closes, *fast, *slow, *signal);
                SeriesData::MacdLines {
                    macd: lines.macd,
                    signal: lines.signal,
                    fast: *fast,
                    slow: *slow,
                    signal_period: *signal,
                }
            }
            IndicatorSpec::Roc { period } => SeriesData::Series(roc::roc(&closes, *period)),
            IndicatorSpec::Cci { period } => SeriesData::Series(cci::cci(bars, *period)),
        };
        result.push(spec.key(), data);
    }

    result
}

/// Extract close prices from a slice of bars.
pub fn close_prices(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::days(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
            })
            .collect()
    }

    fn table(raw: &str) -> toml::Table {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn parse_known_types() {
        let spec = IndicatorSpec::parse("SMA", &table("period = 50")).unwrap();
        assert_eq!(spec, IndicatorSpec::Sma { period: 50 });

        let spec = IndicatorSpec::parse("MACD", &table("fast = 5\nslow = 10\nsignal = 4")).unwrap();
        assert_eq!(
            spec,
            IndicatorSpec::Macd {
                fast: 5,
                slow: 10,
                signal: 4
            }
        );

        let spec = IndicatorSpec::parse("VWAP", &table("")).unwrap();
        assert_eq!(spec, IndicatorSpec::Vwap);
    }

    #[test]
    fn parse_applies_defaults_for_missing_params() {
        assert_eq!(
            IndicatorSpec::parse("RSI", &table("")).unwrap(),
            IndicatorSpec::Rsi { period: 14 }
        );
        assert_eq!(
            IndicatorSpec::parse("MACD", &table("")).unwrap(),
            IndicatorSpec::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(IndicatorSpec::parse("Stochastic", &table("")).is_err());
        assert!(IndicatorSpec::parse("", &table("")).is_err());
        assert!(IndicatorSpec::parse("sma", &table("")).is_err());
    }

    #[test]
    fn parse_rejects_malformed_params() {
        assert!(IndicatorSpec::parse("SMA", &table("period = 0")).is_err());
        assert!(IndicatorSpec::parse("SMA", &table("period = -3")).is_err());
        assert!(IndicatorSpec::parse("SMA", &table("period = 2.5")).is_err());
        assert!(IndicatorSpec::parse("SMA", &table("period = \"20\"")).is_err());
        assert!(IndicatorSpec::parse("MACD", &table("slow = 0")).is_err());
    }

    #[test]
    fn display_keys() {
        assert_eq!(IndicatorSpec::Sma { period: 20 }.key(), "SMA_20");
        assert_eq!(IndicatorSpec::Rsi { period: 14 }.key(), "RSI_14");
        assert_eq!(
            IndicatorSpec::BollingerBands { period: 20 }.key(),
            "Bollinger_Bands_20"
        );
        assert_eq!(IndicatorSpec::Vwap.key(), "VWAP");
        assert_eq!(
            IndicatorSpec::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
            .key(),
            "MACD"
        );
    }

    #[test]
    fn compute_preserves_spec_order_and_duplicates() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let specs = [
            IndicatorSpec::Rsi { period: 2 },
            IndicatorSpec::Sma { period: 2 },
            IndicatorSpec::Sma { period: 2 },
        ];
        let result = compute(&bars, &specs);
        let keys: Vec<&str> = result.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["RSI_2", "SMA_2", "SMA_2"]);
    }

    #[test]
    fn compute_empty_series_yields_empty_outputs() {
        let specs = [
            IndicatorSpec::Sma { period: 20 },
            IndicatorSpec::Vwap,
            IndicatorSpec::Macd {
                fast: 12,
                slow: 26,
                signal: 9,
            },
        ];
        let result = compute(&[], &specs);
        assert_eq!(result.entries().len(), 3);
        for entry in result.entries() {
            match &entry.data {
                SeriesData::Series(v) => assert!(v.is_empty()),
                SeriesData::Bands { upper, lower } => {
                    assert!(upper.is_empty() && lower.is_empty())
                }
                SeriesData::MacdLines { macd, signal, .. } => {
                    assert!(macd.is_empty() && signal.is_empty())
                }
            }
        }
    }

    #[test]
    fn compute_no_specs_yields_empty_result() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0]);
        assert!(compute(&bars, &[]).is_empty());
    }

    #[test]
    fn every_series_has_one_value_per_bar() {
        let bars = bars_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let specs = [
            IndicatorSpec::Sma { period: 3 },
            IndicatorSpec::Ema { period: 3 },
            IndicatorSpec::BollingerBands { period: 3 },
            IndicatorSpec::Vwap,
            IndicatorSpec::Rsi { period: 3 },
            IndicatorSpec::Macd {
                fast: 2,
                slow: 4,
                signal: 2,
            },
            IndicatorSpec::Roc { period: 3 },
            IndicatorSpec::Cci { period: 3 },
        ];
        let result = compute(&bars, &specs);
        for entry in result.entries() {
            match &entry.data {
                SeriesData::Series(v) => assert_eq!(v.len(), 6, "{}", entry.key),
                SeriesData::Bands { upper, lower } => {
                    assert_eq!(upper.len(), 6);
                    assert_eq!(lower.len(), 6);
                }
                SeriesData::MacdLines { macd, signal, .. } => {
                    assert_eq!(macd.len(), 6);
                    assert_eq!(signal.len(), 6);
                }
            }
        }
    }

    #[test]
    fn thirty_rising_bars_scenario() {
        // 30 daily bars, closes 100..=129
        let closes: Vec<f64> = (100..=129).map(|i| i as f64).collect();
        let bars = bars_from_closes(&closes);
        let specs = [
            IndicatorSpec::Sma { period: 20 },
            IndicatorSpec::Rsi { period: 14 },
        ];
        let result = compute(&bars, &specs);

        let Some(SeriesData::Series(sma)) = result.get("SMA_20") else {
            panic!("missing SMA_20");
        };
        // mean(closes[10..=29]) = 119.5
        assert!((sma[29] - 119.5).abs() < 1e-9);
        assert_eq!(sma.iter().filter(|v| v.is_nan()).count(), 19);

        let Some(SeriesData::Series(rsi)) = result.get("RSI_14") else {
            panic!("missing RSI_14");
        };
        // Strictly rising closes: zero average loss resolves to 100
        for v in &rsi[14..] {
            assert_eq!(*v, 100.0);
        }
    }
}
