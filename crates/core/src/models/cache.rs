use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::stock::StockInfo;

/// Default freshness window for cached quotes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Payload of a single cache slot. Price and info quotes for the same
/// symbol live under distinct keys because their shapes differ.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Price(f64),
    Info(StockInfo),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    fetched_at: Instant,
}

/// Process-local read-through cache for quote data.
///
/// - Keyed by `"{SYMBOL}_price"` / `"{SYMBOL}_info"` (symbols uppercased).
/// - An entry is valid iff it is younger than the freshness window
///   (60 seconds by default). Expired entries are never returned.
/// - No eviction: a stale entry stays in the map until the next
///   successful fetch overwrites it. Size is bounded in practice by the
///   number of distinct symbols requested.
#[derive(Debug, Clone)]
pub struct QuoteCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Cache with a custom freshness window (shorter windows are handy in tests).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    fn price_key(symbol: &str) -> String {
        format!("{}_price", symbol.to_uppercase())
    }

    fn info_key(symbol: &str) -> String {
        format!("{}_info", symbol.to_uppercase())
    }

    fn get_fresh(&self, key: &str) -> Option<&CachedValue> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(&entry.value)
        } else {
            None
        }
    }

    fn set(&mut self, key: String, value: CachedValue) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Get a fresh cached price for a symbol, if any.
    pub fn get_price(&self, symbol: &str) -> Option<f64> {
        match self.get_fresh(&Self::price_key(symbol))? {
            CachedValue::Price(p) => Some(*p),
            CachedValue::Info(_) => None,
        }
    }

    /// Get fresh cached stock info for a symbol, if any.
    pub fn get_info(&self, symbol: &str) -> Option<StockInfo> {
        match self.get_fresh(&Self::info_key(symbol))? {
            CachedValue::Info(info) => Some(info.clone()),
            CachedValue::Price(_) => None,
        }
    }

    /// Cache a freshly fetched price, stamping it with the current time.
    pub fn set_price(&mut self, symbol: &str, price: f64) {
        self.set(Self::price_key(symbol), CachedValue::Price(price));
    }

    /// Cache freshly fetched stock info, stamping it with the current time.
    pub fn set_info(&mut self, symbol: &str, info: StockInfo) {
        self.set(Self::info_key(symbol), CachedValue::Info(info));
    }

    /// Total number of cache slots, fresh and stale alike.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Drop all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new()
    }
}
