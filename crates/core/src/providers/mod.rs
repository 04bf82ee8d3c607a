pub mod registry;
pub mod traits;

// API provider implementations
pub mod alpha_vantage;
pub mod yahoo_finance;
