//! Quote acquisition core for the StockBot paper-trading backend.
//!
//! This crate is the in-process library behind the backend's market-data
//! endpoints: a [`QuoteService`] that fetches quotes from a primary
//! provider (Alpha Vantage) with automatic fallback (Yahoo Finance),
//! a 60-second read-through cache, and US-Eastern market-hours
//! computation. It exposes no network surface of its own; the HTTP
//! layer, portfolio bookkeeping, and persistence live elsewhere and
//! call into it.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use stockbot_core::{ProviderRegistry, QuoteService};
//!
//! # async fn demo() {
//! let mut api_keys = HashMap::new();
//! api_keys.insert("alphavantage".to_string(), "demo".to_string());
//!
//! let service = QuoteService::new(ProviderRegistry::new_with_defaults(&api_keys));
//! if let Some(price) = service.get_current_price("aapl").await {
//!     println!("AAPL: ${price}");
//! }
//! let status = service.market_status();
//! println!("market open: {}, next open: {}", status.is_open, status.next_open);
//! # }
//! ```

pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

pub use errors::QuoteError;
pub use models::cache::QuoteCache;
pub use models::market::MarketStatus;
pub use models::stock::{PricePoint, StockInfo};
pub use providers::registry::ProviderRegistry;
pub use providers::traits::QuoteProvider;
pub use services::quote_service::QuoteService;
