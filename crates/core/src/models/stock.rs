use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Snapshot of a stock's market data, as returned by a quote provider.
///
/// Immutable once constructed. The optional fundamentals (`market_cap`,
/// `pe_ratio`, 52-week range) are only populated when the provider's
/// metadata endpoint answers; a quote is still usable without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Ticker symbol, uppercased (e.g., "AAPL")
    pub symbol: String,

    pub current_price: f64,

    /// Percent change versus the previous close (e.g., 1.25 = +1.25%).
    pub change_percent: f64,

    /// Daily traded volume; 0 when the provider has no volume data.
    pub volume: u64,

    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
}

impl StockInfo {
    /// Minimal quote with just the fields every provider can supply.
    pub fn new(
        symbol: impl Into<String>,
        current_price: f64,
        change_percent: f64,
        volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            current_price,
            change_percent,
            volume,
            market_cap: None,
            pe_ratio: None,
            week_52_high: None,
            week_52_low: None,
        }
    }
}

/// Percent change of `current` versus `previous_close`.
///
/// A zero previous close yields 0.0 rather than a division-by-zero
/// infinity/NaN (fresh listings can report previous close = 0).
pub fn change_percent(current: f64, previous_close: f64) -> f64 {
    if previous_close == 0.0 {
        0.0
    } else {
        (current - previous_close) / previous_close * 100.0
    }
}
