/// RSI (Relative Strength Index) over simple trailing averages of gains and
/// losses.
///
/// The first `period` positions are NaN (a delta needs two bars, then a full
/// window of deltas). A window with zero average loss resolves to 100 when
/// gains are present and 50 when the window is completely flat, so the ratio
/// never divides by zero.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if values.len() <= period {
        return out;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    // delta[j] is the move into bar j+1, so bar i closes the window
    // deltas[i-period..i]
    for i in period..values.len() {
        let window = &deltas[i - period..i];
        let avg_gain = window.iter().map(|&d| d.max(0.0)).sum::<f64>() / period as f64;
        let avg_loss = window.iter().map(|&d| (-d).max(0.0)).sum::<f64>() / period as f64;
        out[i] = rsi_value(avg_gain, avg_loss);
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
