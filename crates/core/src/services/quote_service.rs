use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;

use crate::models::cache::QuoteCache;
use crate::models::market::MarketStatus;
use crate::models::stock::{PricePoint, StockInfo};
use crate::providers::registry::ProviderRegistry;
use crate::services::market_calendar;

/// Upper bound on a single provider call. A provider that exceeds it is
/// treated exactly like a failed provider: logged and fallen back from.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Curated watchlist served when no personalized trending data exists.
const TRENDING_SYMBOLS: &[&str] = &[
    "AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "META", "NVDA", "NFLX", "AMD", "INTC", "SPY", "QQQ",
    "IWM", "DIA", "VTI",
];

/// Fetches stock quotes from API providers with caching and fallback.
///
/// Control flow for every quote lookup:
/// 1. Check the 60-second read-through cache → return on a fresh hit.
/// 2. On miss, walk the provider chain in registration order (primary
///    first). The first provider that returns data wins; failures and
///    timeouts are logged and the next provider is tried.
/// 3. A successful result is cached; exhausting the chain yields `None`.
///
/// Provider failures never escape this type: "no data" is `None`, not
/// an error. The cache sits behind a mutex locked only for the lookup
/// or insert itself — never across a provider call — so concurrent
/// callers can fetch in parallel. Two simultaneous misses for the same
/// symbol may both hit a provider; that duplication is accepted at the
/// request volumes this service targets.
pub struct QuoteService {
    registry: ProviderRegistry,
    cache: Mutex<QuoteCache>,
    call_timeout: Duration,
}

impl QuoteService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            cache: Mutex::new(QuoteCache::new()),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the cache freshness window (shorter windows in tests).
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Mutex::new(QuoteCache::with_ttl(ttl));
        self
    }

    /// Override the per-provider-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Get comprehensive stock information for a symbol.
    ///
    /// Returns `None` when no provider has data for the symbol — a
    /// normal outcome, not a fault.
    pub async fn get_stock_info(&self, symbol: &str) -> Option<StockInfo> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return None;
        }

        if let Some(info) = self.lock_cache().get_info(&symbol) {
            log::debug!("Cache hit for {symbol} info");
            return Some(info);
        }

        for provider in self.registry.providers() {
            match timeout(self.call_timeout, provider.stock_info(&symbol)).await {
                Ok(Ok(Some(info))) => {
                    log::info!("Fetched {symbol} info from {}", provider.name());
                    self.lock_cache().set_info(&symbol, info.clone());
                    return Some(info);
                }
                Ok(Ok(None)) => {
                    log::info!("{} has no data for {symbol}", provider.name());
                }
                Ok(Err(e)) => {
                    log::warn!("{} failed for {symbol}: {e}, falling back", provider.name());
                }
                Err(_) => {
                    log::warn!("{} timed out for {symbol}, falling back", provider.name());
                }
            }
        }

        log::warn!("No provider returned info for {symbol}");
        None
    }

    /// Get the current price for a symbol.
    ///
    /// Cached separately from [`get_stock_info`](Self::get_stock_info)
    /// (same freshness window, distinct payload shape). Returns `None`
    /// when no provider yields a price.
    pub async fn get_current_price(&self, symbol: &str) -> Option<f64> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return None;
        }

        if let Some(price) = self.lock_cache().get_price(&symbol) {
            log::debug!("Cache hit for {symbol} price");
            return Some(price);
        }

        for provider in self.registry.providers() {
            match timeout(self.call_timeout, provider.current_price(&symbol)).await {
                Ok(Ok(Some(price))) => {
                    log::info!("Fetched {symbol} price from {}: ${price}", provider.name());
                    self.lock_cache().set_price(&symbol, price);
                    return Some(price);
                }
                Ok(Ok(None)) => {
                    log::info!("{} has no price for {symbol}", provider.name());
                }
                Ok(Err(e)) => {
                    log::warn!("{} failed for {symbol}: {e}, falling back", provider.name());
                }
                Err(_) => {
                    log::warn!("{} timed out for {symbol}, falling back", provider.name());
                }
            }
        }

        log::warn!("No provider returned a price for {symbol}");
        None
    }

    /// Check whether a symbol is known to any provider.
    ///
    /// All fetch failures are swallowed to `false`.
    pub async fn validate_symbol(&self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return false;
        }

        for provider in self.registry.providers() {
            if let Ok(Ok(Some(_))) = timeout(self.call_timeout, provider.stock_info(&symbol)).await
            {
                return true;
            }
        }
        false
    }

    /// Daily closing prices for the trailing `days` window.
    ///
    /// Walks the provider chain like the quote lookups but is never
    /// cached. `None` when no provider has any history for the symbol.
    pub async fn price_history(&self, symbol: &str, days: u32) -> Option<Vec<PricePoint>> {
        let symbol = normalize_symbol(symbol);
        if symbol.is_empty() {
            return None;
        }

        let to = Utc::now().date_naive();
        let from = to - chrono::Duration::days(i64::from(days));

        for provider in self.registry.providers() {
            match timeout(self.call_timeout, provider.price_history(&symbol, from, to)).await {
                Ok(Ok(points)) if !points.is_empty() => return Some(points),
                Ok(Ok(_)) => {
                    log::info!("{} has no history for {symbol}", provider.name());
                }
                Ok(Err(e)) => {
                    log::warn!("{} failed for {symbol}: {e}, falling back", provider.name());
                }
                Err(_) => {
                    log::warn!("{} timed out for {symbol}, falling back", provider.name());
                }
            }
        }
        None
    }

    /// Current US market open/closed state, computed fresh on every call.
    pub fn market_status(&self) -> MarketStatus {
        market_calendar::market_status()
    }

    /// Curated list of widely traded symbols.
    pub fn trending_symbols() -> &'static [&'static str] {
        TRENDING_SYMBOLS
    }

    /// Number of cache slots in use (fresh and stale alike).
    #[must_use]
    pub fn cache_entry_count(&self) -> usize {
        self.lock_cache().entry_count()
    }

    /// Drop all cached quotes; the next lookup goes to the providers.
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, QuoteCache> {
        // A poisoned lock only means another caller panicked mid-insert;
        // the cache itself stays usable.
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Symbols are case-insensitive; all cache keys and outputs use uppercase.
fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}
