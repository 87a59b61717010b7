use crate::model::Bar;

/// Lambert's scaling constant.
const CCI_FACTOR: f64 = 0.015;

/// Commodity Channel Index over the typical price (high + low + close) / 3.
///
/// CCI = (tp − SMA(tp, period)) / (0.015 · MAD(tp, period)), where MAD is the
/// mean absolute deviation of the window from its own mean. Warm-up positions
/// and windows with zero deviation are NaN.
pub fn cci(bars: &[Bar], period: usize) -> Vec<f64> {
    let tp: Vec<f64> = bars
        .iter()
        .map(|b| (b.high + b.low + b.close) / 3.0)
        .collect();

    let mut out = vec![f64::NAN; tp.len()];
    for (i, window) in tp.windows(period).enumerate() {
        let idx = i + period - 1;
        let mean = window.iter().sum::<f64>() / period as f64;
        let mad = window.iter().map(|&v| (v - mean).abs()).sum::<f64>() / period as f64;
        if mad == 0.0 {
            continue;
        }
        out[idx] = (tp[idx] - mean) / (CCI_FACTOR * mad);
    }

    out
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

    #[test]
    fn warm_up_positions_are_nan() {
        let bars = bars_from_closes(&[1.0, 2.0, 4.0, 8.0]);
        let values = cci(&bars, 3);
        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert!(!values[2].is_nan());
    }

    #[test]
    fn linear_typical_price_gives_100() {
        // Window [i-2, i-1, i]: mean = i-1, mad = 2/3, tp - mean = 1
        // -> 1 / (0.015 * 2/3) = 100
        let closes: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let bars = bars_from_closes(&closes);
        let values = cci(&bars, 3);
        for v in &values[2..] {
            assert!((v - 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn flat_window_is_undefined() {
        let bars = bars_from_closes(&[5.0; 6]);
        let values = cci(&bars, 3);
        assert!(values.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn uses_high_low_close_average() {
        let mut bars = bars_from_closes(&[10.0, 10.0, 10.0, 10.0]);
        // Push the last typical price above the window mean
        bars[3].high = 16.0;
        bars[3].low = 10.0;
        bars[3].close = 13.0;
        let values = cci(&bars, 3);
        assert!(values[3] > 0.0);
    }

    #[test]
    fn empty_series() {
        assert!(cci(&[], 3).is_empty());
    }
}
