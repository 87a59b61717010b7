/// Simple Moving Average.
///
/// Returns one value per input position; the first `period - 1` positions are
/// NaN (warm-up).
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for (i, window) in values.windows(period).enumerate() {
        out[i + period - 1] = window.iter().sum::<f64>() / period as f64;
    }
    out
}

/// Exponential Moving Average with smoothing derived from span:
/// `alpha = 2 / (period + 1)`.
///
/// Seeded with the first value, so every position is defined. Early values
/// are biased toward the seed.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = 0.0;
    for (i, &value) in values.iter().enumerate() {
        prev = if i == 0 {
            value
        } else {
            alpha * value + (1.0 - alpha) * prev
        };
        out.push(prev);
    }
    out
}
