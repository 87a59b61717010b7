use super::ma::sma;

/// Band width in standard deviations.
const STD_DEV_MULTIPLIER: f64 = 2.0;

pub struct Bands {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Bollinger Bands: SMA(period) ± 2 · sample standard deviation.
///
/// Uses the sample (ddof = 1) standard deviation of the trailing window, so a
/// period of 1 leaves every position NaN. Warm-up positions are NaN.
pub fn bands(values: &[f64], period: usize) -> Bands {
    let middle = sma(values, period);
    let mut upper = vec![f64::NAN; values.len()];
    let mut lower = vec![f64::NAN; values.len()];

    if period < 2 {
        return Bands { upper, lower };
    }

    for (i, window) in values.windows(period).enumerate() {
        let idx = i + period - 1;
        let mean = middle[idx];
        let variance =
            window.iter().map(|&p| (p - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        let std_dev = variance.sqrt();
        upper[idx] = mean + STD_DEV_MULTIPLIER * std_dev;
        lower[idx] = mean - STD_DEV_MULTIPLIER * std_dev;
    }

    Bands { upper, lower }
}
