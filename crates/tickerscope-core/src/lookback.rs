//! Lookback buffer sizing.
//!
//! Rolling windows need `window` prior observations before their first
//! defined value. Fetching extra history ahead of the requested start keeps
//! the first user-visible row fully populated; the frame is trimmed back to
//! the requested range after enrichment.

use crate::TradingDate;

/// Calendar days of extra history to fetch ahead of the requested start.
///
/// Calendar days overcount trading days (weekends, holidays), so the window
/// is doubled as a safety margin rather than consulting a trading calendar.
/// The multiplier is a heuristic, approximate by design.
pub fn lookback_days(volatility_window: usize, rsi_period: usize) -> u32 {
    let widest = volatility_window.max(rsi_period);
    (2 * widest).try_into().unwrap_or(u32::MAX)
}

/// Extended fetch-start date for a requested range.
pub fn fetch_start(
    requested_start: TradingDate,
    volatility_window: usize,
    rsi_period: usize,
) -> TradingDate {
    requested_start.minus_days(lookback_days(volatility_window, rsi_period))
}
