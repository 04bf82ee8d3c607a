use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::QuoteError;
use crate::models::stock::{PricePoint, StockInfo};

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Request timeout for Alpha Vantage calls. A slow provider must not
/// stall a quote request; timing out here triggers the fallback chain.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Alpha Vantage API provider — the primary stock quote source.
///
/// - **Free tier**: 25 requests/day (across ALL endpoints).
/// - **Requires**: API key (registered as "alphavantage").
/// - **Coverage**: 100k+ global equity symbols.
///
/// `GLOBAL_QUOTE` supplies price/volume/change; `OVERVIEW` supplies the
/// optional fundamentals (market cap, P/E, 52-week range) on a
/// best-effort basis. A rate-limit "Note" in the response body is a
/// provider failure, while an empty quote object means the symbol is
/// simply unknown.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

#[derive(Deserialize)]
struct OverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,
}

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantageProvider {
    /// Fetch the GLOBAL_QUOTE payload for a symbol.
    ///
    /// `Ok(None)` when the API answers with an empty quote object
    /// (unknown symbol); `Err` on rate-limit notes or malformed bodies.
    async fn fetch_global_quote(&self, symbol: &str) -> Result<Option<GlobalQuote>, QuoteError> {
        let resp: GlobalQuoteResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| QuoteError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        if let Some(note) = resp.note.or(resp.information) {
            return Err(QuoteError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Rate limited: {note}"),
            });
        }

        // An empty "Global Quote" object means the symbol has no data.
        Ok(resp.global_quote.filter(|q| q.price.is_some()))
    }

    /// Best-effort OVERVIEW fetch for fundamentals. Any failure is
    /// logged and swallowed — a quote is still usable without them.
    async fn fetch_overview(&self, symbol: &str) -> Option<OverviewResponse> {
        let result = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", &self.api_key),
            ])
            .send()
            .await
            .ok()?
            .json::<OverviewResponse>()
            .await;

        match result {
            Ok(overview) if overview.symbol.is_some() => Some(overview),
            Ok(_) => None,
            Err(e) => {
                log::debug!("Alpha Vantage overview fetch failed for {symbol}: {e}");
                None
            }
        }
    }

    fn parse_price(symbol: &str, raw: &str) -> Result<f64, QuoteError> {
        raw.parse().map_err(|e| QuoteError::Api {
            provider: "Alpha Vantage".into(),
            message: format!("Invalid price format for {symbol}: {e}"),
        })
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "Alpha Vantage"
    }

    async fn stock_info(&self, symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        let quote = match self.fetch_global_quote(symbol).await? {
            Some(q) => q,
            None => return Ok(None),
        };

        let price_str = quote.price.as_deref().unwrap_or_default();
        let current_price = Self::parse_price(symbol, price_str)?;

        // "10. change percent" arrives as e.g. "1.2345%"
        let change_percent = quote
            .change_percent
            .as_deref()
            .and_then(|s| s.trim_end_matches('%').parse().ok())
            .unwrap_or(0.0);

        let volume = quote
            .volume
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let mut info = StockInfo::new(symbol, current_price, change_percent, volume);

        if let Some(overview) = self.fetch_overview(symbol).await {
            info.market_cap = overview.market_cap.and_then(|s| s.parse().ok());
            info.pe_ratio = overview.pe_ratio.and_then(|s| s.parse().ok());
            info.week_52_high = overview.week_52_high.and_then(|s| s.parse().ok());
            info.week_52_low = overview.week_52_low.and_then(|s| s.parse().ok());
        }

        Ok(Some(info))
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<f64>, QuoteError> {
        match self.fetch_global_quote(symbol).await? {
            Some(quote) => {
                let raw = quote.price.as_deref().unwrap_or_default();
                Ok(Some(Self::parse_price(symbol, raw)?))
            }
            None => Ok(None),
        }
    }

    async fn price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        let resp: TimeSeriesResponse = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| QuoteError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Failed to parse time series for {symbol}: {e}"),
            })?;

        if let Some(note) = resp.note.or(resp.information) {
            return Err(QuoteError::Api {
                provider: "Alpha Vantage".into(),
                message: format!("Rate limited: {note}"),
            });
        }

        let time_series = match resp.time_series {
            Some(series) => series,
            None => return Ok(Vec::new()), // unknown symbol
        };

        let mut points: Vec<PricePoint> = time_series
            .iter()
            .filter_map(|(date_str, data)| {
                let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
                if date >= from && date <= to {
                    let price: f64 = data.close.parse().ok()?;
                    Some(PricePoint { date, price })
                } else {
                    None
                }
            })
            .collect();

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
