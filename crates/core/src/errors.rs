use thiserror::Error;

/// Unified error type for the stockbot-core quote layer.
///
/// These errors circulate between providers and the `QuoteService`; the
/// service swallows all of them at its public boundary and surfaces
/// "no data" as `None` instead. Callers only ever see a `QuoteError`
/// when talking to a provider directly.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider call timed out ({provider})")]
    Timeout { provider: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        QuoteError::Network(sanitized)
    }
}
