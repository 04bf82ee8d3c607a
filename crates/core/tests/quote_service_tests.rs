// ═══════════════════════════════════════════════════════════════════
// QuoteService Tests — caching, provider fallback, timeouts
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use stockbot_core::errors::QuoteError;
use stockbot_core::models::stock::{PricePoint, StockInfo};
use stockbot_core::providers::registry::ProviderRegistry;
use stockbot_core::providers::traits::QuoteProvider;
use stockbot_core::services::quote_service::QuoteService;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// Counts calls made to a mock provider, shared with the test body.
#[derive(Default)]
struct CallCounter {
    price: AtomicUsize,
    info: AtomicUsize,
    history: AtomicUsize,
}

/// A provider that always answers with a fixed price.
struct StaticProvider {
    name: String,
    price: f64,
    counter: Arc<CallCounter>,
}

impl StaticProvider {
    fn new(name: &str, price: f64) -> (Self, Arc<CallCounter>) {
        let counter = Arc::new(CallCounter::default());
        (
            Self {
                name: name.to_string(),
                price,
                counter: Arc::clone(&counter),
            },
            counter,
        )
    }
}

#[async_trait]
impl QuoteProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stock_info(&self, symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        self.counter.info.fetch_add(1, Ordering::SeqCst);
        Ok(Some(StockInfo::new(symbol, self.price, 1.5, 1_000)))
    }

    async fn current_price(&self, _symbol: &str) -> Result<Option<f64>, QuoteError> {
        self.counter.price.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.price))
    }

    async fn price_history(
        &self,
        _symbol: &str,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        self.counter.history.fetch_add(1, Ordering::SeqCst);
        Ok(vec![PricePoint {
            date: from,
            price: self.price,
        }])
    }
}

/// A provider that always fails (network down, rate limited, ...).
struct FailingProvider {
    name: String,
    counter: Arc<CallCounter>,
}

impl FailingProvider {
    fn new(name: &str) -> (Self, Arc<CallCounter>) {
        let counter = Arc::new(CallCounter::default());
        (
            Self {
                name: name.to_string(),
                counter: Arc::clone(&counter),
            },
            counter,
        )
    }

    fn fail(&self) -> QuoteError {
        QuoteError::Api {
            provider: self.name.clone(),
            message: "boom".into(),
        }
    }
}

#[async_trait]
impl QuoteProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stock_info(&self, _symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        self.counter.info.fetch_add(1, Ordering::SeqCst);
        Err(self.fail())
    }

    async fn current_price(&self, _symbol: &str) -> Result<Option<f64>, QuoteError> {
        self.counter.price.fetch_add(1, Ordering::SeqCst);
        Err(self.fail())
    }

    async fn price_history(
        &self,
        _symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        self.counter.history.fetch_add(1, Ordering::SeqCst);
        Err(self.fail())
    }
}

/// A provider that answers but has no data for any symbol.
struct EmptyProvider;

#[async_trait]
impl QuoteProvider for EmptyProvider {
    fn name(&self) -> &str {
        "Empty"
    }

    async fn stock_info(&self, _symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        Ok(None)
    }

    async fn current_price(&self, _symbol: &str) -> Result<Option<f64>, QuoteError> {
        Ok(None)
    }

    async fn price_history(
        &self,
        _symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        Ok(Vec::new())
    }
}

/// A provider that never answers within any reasonable timeout.
struct SlowProvider;

#[async_trait]
impl QuoteProvider for SlowProvider {
    fn name(&self) -> &str {
        "Slow"
    }

    async fn stock_info(&self, symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Some(StockInfo::new(symbol, 1.0, 0.0, 0)))
    }

    async fn current_price(&self, _symbol: &str) -> Result<Option<f64>, QuoteError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Some(1.0))
    }

    async fn price_history(
        &self,
        _symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
}

fn service_with(providers: Vec<Box<dyn QuoteProvider>>) -> QuoteService {
    let mut registry = ProviderRegistry::new();
    for p in providers {
        registry.register(p);
    }
    QuoteService::new(registry)
}

// ═══════════════════════════════════════════════════════════════════
// Cache behavior
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn second_price_call_within_window_hits_cache() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    let first = service.get_current_price("AAPL").await;
    let second = service.get_current_price("AAPL").await;

    assert_eq!(first, Some(185.0));
    assert_eq!(second, Some(185.0));
    assert_eq!(counter.price.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_entry_triggers_refetch() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service =
        service_with(vec![Box::new(provider)]).with_cache_ttl(Duration::from_millis(30));

    assert_eq!(service.get_current_price("AAPL").await, Some(185.0));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(service.get_current_price("AAPL").await, Some(185.0));

    assert_eq!(counter.price.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn symbol_lookup_is_case_insensitive() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    assert_eq!(service.get_current_price("aapl").await, Some(185.0));
    assert_eq!(service.get_current_price("AAPL").await, Some(185.0));
    assert_eq!(service.get_current_price(" Aapl ").await, Some(185.0));

    // All three spellings share one cache entry.
    assert_eq!(counter.price.load(Ordering::SeqCst), 1);
    assert_eq!(service.cache_entry_count(), 1);
}

#[tokio::test]
async fn price_and_info_use_distinct_cache_slots() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    assert!(service.get_current_price("AAPL").await.is_some());
    assert!(service.get_stock_info("AAPL").await.is_some());

    // A cached price must not satisfy an info lookup, or vice versa.
    assert_eq!(counter.price.load(Ordering::SeqCst), 1);
    assert_eq!(counter.info.load(Ordering::SeqCst), 1);
    assert_eq!(service.cache_entry_count(), 2);
}

#[tokio::test]
async fn clear_cache_forces_provider_call() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    assert!(service.get_current_price("AAPL").await.is_some());
    service.clear_cache();
    assert!(service.get_current_price("AAPL").await.is_some());

    assert_eq!(counter.price.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn stock_info_result_is_cached() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    let first = service.get_stock_info("AAPL").await.unwrap();
    let second = service.get_stock_info("AAPL").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.symbol, "AAPL");
    assert_eq!(counter.info.load(Ordering::SeqCst), 1);
}

// ═══════════════════════════════════════════════════════════════════
// Fallback behavior
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn primary_failure_falls_back_to_secondary() {
    let (primary, primary_counter) = FailingProvider::new("Primary");
    let (fallback, fallback_counter) = StaticProvider::new("Fallback", 42.0);
    let service = service_with(vec![Box::new(primary), Box::new(fallback)]);

    assert_eq!(service.get_current_price("TSLA").await, Some(42.0));
    assert_eq!(primary_counter.price.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_counter.price.load(Ordering::SeqCst), 1);

    // The fallback result was cached: neither provider is hit again.
    assert_eq!(service.get_current_price("TSLA").await, Some(42.0));
    assert_eq!(primary_counter.price.load(Ordering::SeqCst), 1);
    assert_eq!(fallback_counter.price.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn primary_without_data_falls_back_to_secondary() {
    let (fallback, _) = StaticProvider::new("Fallback", 42.0);
    let service = service_with(vec![Box::new(EmptyProvider), Box::new(fallback)]);

    let info = service.get_stock_info("TSLA").await.unwrap();
    assert_eq!(info.current_price, 42.0);
}

#[tokio::test]
async fn timed_out_primary_falls_back() {
    let (fallback, _) = StaticProvider::new("Fallback", 42.0);
    let service = service_with(vec![Box::new(SlowProvider), Box::new(fallback)])
        .with_call_timeout(Duration::from_millis(50));

    assert_eq!(service.get_current_price("TSLA").await, Some(42.0));
}

#[tokio::test]
async fn all_providers_failing_yields_none_not_error() {
    let (a, _) = FailingProvider::new("Primary");
    let (b, _) = FailingProvider::new("Fallback");
    let service = service_with(vec![Box::new(a), Box::new(b)]);

    assert_eq!(service.get_current_price("ZZZZ").await, None);
    assert!(service.get_stock_info("ZZZZ").await.is_none());
}

#[tokio::test]
async fn all_providers_empty_yields_none() {
    let service = service_with(vec![Box::new(EmptyProvider)]);

    assert_eq!(service.get_current_price("ZZZZ").await, None);
    assert!(service.get_stock_info("ZZZZ").await.is_none());
    assert!(service.price_history("ZZZZ", 30).await.is_none());
}

#[tokio::test]
async fn empty_registry_yields_none() {
    let service = QuoteService::new(ProviderRegistry::new());
    assert_eq!(service.get_current_price("AAPL").await, None);
}

// ═══════════════════════════════════════════════════════════════════
// Symbol validation & history
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn validate_symbol_true_when_a_provider_knows_it() {
    let (primary, _) = FailingProvider::new("Primary");
    let (fallback, _) = StaticProvider::new("Fallback", 10.0);
    let service = service_with(vec![Box::new(primary), Box::new(fallback)]);

    assert!(service.validate_symbol("MSFT").await);
}

#[tokio::test]
async fn validate_symbol_false_on_total_failure() {
    let (a, _) = FailingProvider::new("Primary");
    let service = service_with(vec![Box::new(a)]);

    assert!(!service.validate_symbol("MSFT").await);
    assert!(!service.validate_symbol("").await);
}

#[tokio::test]
async fn price_history_falls_back_and_is_not_cached() {
    let (primary, primary_counter) = FailingProvider::new("Primary");
    let (fallback, fallback_counter) = StaticProvider::new("Fallback", 10.0);
    let service = service_with(vec![Box::new(primary), Box::new(fallback)]);

    assert!(service.price_history("MSFT", 30).await.is_some());
    assert!(service.price_history("MSFT", 30).await.is_some());

    // History is never cached: both calls walk the chain.
    assert_eq!(primary_counter.history.load(Ordering::SeqCst), 2);
    assert_eq!(fallback_counter.history.load(Ordering::SeqCst), 2);
    assert_eq!(service.cache_entry_count(), 0);
}

#[tokio::test]
async fn blank_symbol_returns_none_without_provider_call() {
    let (provider, counter) = StaticProvider::new("Primary", 185.0);
    let service = service_with(vec![Box::new(provider)]);

    assert_eq!(service.get_current_price("   ").await, None);
    assert!(service.get_stock_info("").await.is_none());
    assert_eq!(counter.price.load(Ordering::SeqCst), 0);
    assert_eq!(counter.info.load(Ordering::SeqCst), 0);
}

#[test]
fn trending_symbols_is_a_nonempty_watchlist() {
    let symbols = QuoteService::trending_symbols();
    assert!(!symbols.is_empty());
    assert!(symbols.contains(&"AAPL"));
    assert!(symbols.contains(&"SPY"));
}
