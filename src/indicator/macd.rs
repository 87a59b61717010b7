use super::ma::ema;

pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// MACD line (EMA(fast) − EMA(slow)) and its EMA(signal) signal line.
///
/// Both series are full length: the underlying EMAs are defined at every
/// position.
pub fn lines(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal = ema(&macd, signal);

    MacdSeries { macd, signal }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_line_equals_ema_difference_pointwise() {
        let closes: Vec<f64> = (1..=20).map(|i| (i as f64).sin() + 10.0).collect();
        let m = lines(&closes, 3, 5, 3);
        let fast_ema = ema(&closes, 3);
        let slow_ema = ema(&closes, 5);
        assert_eq!(m.macd.len(), closes.len());
        for i in 0..closes.len() {
            assert!((m.macd[i] - (fast_ema[i] - slow_ema[i])).abs() < 1e-9);
        }
    }

    #[test]
    fn flat_prices_produce_zero_lines() {
        let m = lines(&[10.0; 10], 3, 5, 3);
        for i in 0..10 {
            assert!(m.macd[i].abs() < 1e-9);
            assert!(m.signal[i].abs() < 1e-9);
        }
    }

    #[test]
    fn both_series_full_length_and_defined() {
        let closes: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let m = lines(&closes, 12, 26, 9);
        assert_eq!(m.macd.len(), 12);
        assert_eq!(m.signal.len(), 12);
        assert!(m.macd.iter().all(|v| !v.is_nan()));
        assert!(m.signal.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn empty_series() {
        let m = lines(&[], 12, 26, 9);
        assert!(m.macd.is_empty());
        assert!(m.signal.is_empty());
    }
}
