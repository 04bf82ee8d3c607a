// ═══════════════════════════════════════════════════════════════════
// Error Tests — QuoteError variants, Display formatting
// ═══════════════════════════════════════════════════════════════════

use stockbot_core::errors::QuoteError;

#[test]
fn api_error_names_the_provider() {
    let err = QuoteError::Api {
        provider: "Alpha Vantage".into(),
        message: "rate limited".into(),
    };
    assert_eq!(err.to_string(), "API error (Alpha Vantage): rate limited");
}

#[test]
fn api_error_empty_message() {
    let err = QuoteError::Api {
        provider: "Yahoo Finance".into(),
        message: String::new(),
    };
    assert_eq!(err.to_string(), "API error (Yahoo Finance): ");
}

#[test]
fn network_error() {
    let err = QuoteError::Network("connection refused".into());
    assert_eq!(err.to_string(), "Network error: connection refused");
}

#[test]
fn timeout_names_the_provider() {
    let err = QuoteError::Timeout {
        provider: "Yahoo Finance".into(),
    };
    assert_eq!(err.to_string(), "Provider call timed out (Yahoo Finance)");
}
