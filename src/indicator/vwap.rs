use crate::model::Bar;

/// Volume-Weighted Average Price as a running total over the whole series:
/// cumulative(close · volume) / cumulative(volume) from the first bar.
///
/// Not period-bound — the output depends on where the series starts.
/// Positions are NaN until cumulative volume becomes positive.
pub fn vwap(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    let mut cum_pv = 0.0;
    let mut cum_volume = 0.0;

    for bar in bars {
        cum_pv += bar.close * bar.volume;
        cum_volume += bar.volume;
        if cum_volume > 0.0 {
            out.push(cum_pv / cum_volume);
        } else {
            out.push(f64::NAN);
        }
    }

    out
}
