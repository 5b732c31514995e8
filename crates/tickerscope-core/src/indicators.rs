//! Indicator computations over daily close prices.
//!
//! Every function returns one entry per input row, with `None` marking rows
//! where the indicator is undefined (leading rows whose rolling window is
//! not yet fully populated). Inputs shorter than the window produce a fully
//! undefined column, never an error.

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Day-over-day log returns: `ln(close[i] / close[i-1])`.
///
/// Undefined at row 0 and wherever either close is non-positive.
pub fn log_returns(closes: &[f64]) -> Vec<Option<f64>> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            if i == 0 {
                return None;
            }
            let prev = closes[i - 1];
            if prev > 0.0 && close > 0.0 {
                Some((close / prev).ln())
            } else {
                None
            }
        })
        .collect()
}

/// Annualized rolling volatility: sample standard deviation of the trailing
/// `window` log returns, scaled by sqrt(252).
///
/// A row is defined only when every return in its trailing window is
/// defined; since the first return is undefined, the first defined value
/// lands at row index `window`.
pub fn rolling_volatility(log_returns: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; log_returns.len()];
    if window == 0 {
        return out;
    }

    for (i, slot) in out.iter_mut().enumerate() {
        if i + 1 < window {
            continue;
        }
        let trailing = &log_returns[i + 1 - window..=i];
        if trailing.iter().any(Option::is_none) {
            continue;
        }
        let values: Vec<f64> = trailing.iter().flatten().copied().collect();
        *slot = sample_std(&values).map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt());
    }

    out
}

/// Relative Strength Index over simple moving averages of gains and losses.
///
/// delta[i] = close[i] - close[i-1]; gains and losses are averaged over the
/// trailing `period` deltas, so the first defined value lands at row index
/// `period`. When the average loss is zero but gains exist, RSI saturates
/// at exactly 100; a window with neither gains nor losses is undefined.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    // deltas[j] pairs with close j+1.
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, slot) in out.iter_mut().enumerate().skip(period) {
        let trailing = &deltas[i - period..i];
        let (sum_gain, sum_loss) = trailing.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });

        let period_f = period as f64;
        *slot = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    out
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        // Flat window: no gain, no loss, no information.
        if avg_gain > 0.0 {
            Some(100.0)
        } else {
            None
        }
    } else {
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

/// Sample standard deviation (n - 1 denominator); undefined below two
/// observations.
fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;

    Some(variance.sqrt())
}
