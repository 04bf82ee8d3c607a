use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use super::traits::QuoteProvider;
use crate::errors::QuoteError;
use crate::models::stock::{change_percent, PricePoint, StockInfo};

/// Yahoo Finance API provider — the keyless fallback quote source.
///
/// - **Free**: No API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's public
/// endpoints. Yahoo has no direct "change percent" field, so it is
/// derived from the last two daily closes; volume defaults to 0 when
/// the feed omits it. An empty quote set for a symbol means "no data",
/// not a provider failure.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, QuoteError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| QuoteError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, QuoteError> {
        let month: time::Month = match date.month() {
            1 => time::Month::January,
            2 => time::Month::February,
            3 => time::Month::March,
            4 => time::Month::April,
            5 => time::Month::May,
            6 => time::Month::June,
            7 => time::Month::July,
            8 => time::Month::August,
            9 => time::Month::September,
            10 => time::Month::October,
            11 => time::Month::November,
            12 => time::Month::December,
            _ => unreachable!(),
        };

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| QuoteError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid date {date}: {e}"),
            })?
            .with_hms(0, 0, 0)
            .map_err(|e| QuoteError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid time for {date}: {e}"),
            })?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    /// Fetch the trailing daily quotes for a symbol (oldest first).
    async fn fetch_recent_quotes(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<yahoo_finance_api::Quote>, QuoteError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", range)
            .await
            .map_err(|e| QuoteError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch quotes for {symbol}: {e}"),
            })?;

        resp.quotes().map_err(|e| QuoteError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn stock_info(&self, symbol: &str) -> Result<Option<StockInfo>, QuoteError> {
        // 5-day window so there is a previous close to derive the change from.
        let quotes = self.fetch_recent_quotes(symbol, "5d").await?;

        let last = match quotes.last() {
            Some(q) => q,
            None => return Ok(None),
        };

        let previous_close = if quotes.len() >= 2 {
            quotes[quotes.len() - 2].close
        } else {
            // Single data point: no previous close, change reads as 0.
            last.close
        };

        Ok(Some(StockInfo::new(
            symbol,
            last.close,
            change_percent(last.close, previous_close),
            last.volume,
        )))
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<f64>, QuoteError> {
        let quotes = self.fetch_recent_quotes(symbol, "1d").await?;
        Ok(quotes.last().map(|q| q.close))
    }

    async fn price_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| QuoteError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| QuoteError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                if date >= from && date <= to {
                    Some(PricePoint {
                        date,
                        price: q.close,
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(points)
    }
}
