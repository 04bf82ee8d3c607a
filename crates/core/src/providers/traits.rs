use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::QuoteError;
use crate::models::stock::{PricePoint, StockInfo};

/// Trait abstraction for all market-data providers.
///
/// Each provider (Alpha Vantage, Yahoo Finance) implements this trait.
/// If an API stops working or changes, we replace only that one
/// implementation — the rest of the codebase is untouched.
///
/// Return-value convention: `Err` means the provider itself failed
/// (network, rate limit, malformed response) and the caller may fall
/// back to another provider; `Ok(None)` means the provider answered
/// but has no data for that symbol — a normal outcome, not a fault.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the latest quote with volume and change data for a symbol.
    async fn stock_info(&self, symbol: &str) -> Result<Option<StockInfo>, QuoteError>;

    /// Get just the current (latest) price of a symbol.
    async fn current_price(&self, symbol: &str) -> Result<Option<f64>, QuoteError>;

    /// Get daily closes for a date range (inclusive), sorted by date.
    async fn price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError>;
}
