use std::collections::HashMap;

use super::alpha_vantage::AlphaVantageProvider;
use super::traits::QuoteProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered chain of quote providers.
///
/// Registration order is fallback order: the first provider is the
/// primary source, each subsequent one is tried only after the previous
/// failed or returned no data. New providers can be added without
/// modifying existing code.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the default provider chain pre-configured.
    ///
    /// Alpha Vantage is the primary source (requires an "alphavantage"
    /// API key); Yahoo Finance is the keyless fallback.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Alpha Vantage — primary, requires API key
        if let Some(key) = api_keys.get("alphavantage") {
            registry.register(Box::new(AlphaVantageProvider::new(key.clone())));
        }

        // Yahoo Finance — fallback, no API key needed
        if let Ok(yahoo) = YahooFinanceProvider::new() {
            registry.register(Box::new(yahoo));
        }

        registry
    }

    /// Append a provider to the end of the fallback chain.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All providers in fallback order.
    pub fn providers(&self) -> &[Box<dyn QuoteProvider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
