use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::models::market::MarketStatus;

/// The US equity market clock runs on US Eastern time.
pub const MARKET_TZ: Tz = chrono_tz::America::New_York;

/// Regular session hours, both boundaries inclusive.
const OPEN_HMS: (u32, u32, u32) = (9, 30, 0);
const CLOSE_HMS: (u32, u32, u32) = (16, 0, 0);

/// Market status as of right now.
pub fn market_status() -> MarketStatus {
    market_status_at(Utc::now().with_timezone(&MARKET_TZ))
}

/// Market status for a given instant on the US Eastern clock.
///
/// Open iff it is a weekday (Mon–Fri) and the time of day is within
/// [09:30:00, 16:00:00]. Holidays are not modeled. A failure anywhere
/// in the calendar arithmetic degrades `next_open` to `"Unknown"`
/// rather than propagating.
pub fn market_status_at(now: DateTime<Tz>) -> MarketStatus {
    let is_weekday = now.weekday().num_days_from_monday() < 5;
    let within_hours = match (session_open_time(), session_close_time()) {
        (Some(open), Some(close)) => now.time() >= open && now.time() <= close,
        _ => false,
    };

    MarketStatus {
        is_open: is_weekday && within_hours,
        is_weekday,
        current_time: now.format("%H:%M:%S EST").to_string(),
        next_open: next_market_open(now).unwrap_or_else(|| "Unknown".to_string()),
    }
}

/// Next market open as a `"%Y-%m-%d %H:%M:%S EST"` string.
///
/// This reproduces the established next-open arithmetic exactly,
/// including two quirks that are kept for compatibility rather than
/// corrected:
/// - a weekend advances by `7 - weekday` days, which lands on Monday
///   for both Saturday (+2) and Sunday (+1);
/// - a weekday strictly after 16:00 advances one calendar day without
///   skipping over an upcoming weekend, so Friday evening resolves to
///   Saturday 09:30.
///
/// Day arithmetic happens on the local calendar date, not the zoned
/// instant: adding absolute 24-hour durations to a `DateTime<Tz>`
/// would overshoot by a day across a DST spring-forward weekend.
fn next_market_open(now: DateTime<Tz>) -> Option<String> {
    let weekday = i64::from(now.weekday().num_days_from_monday());
    let close = session_close_time()?;

    let open_date = if weekday >= 5 {
        let days_until_monday = 7 - weekday;
        now.date_naive()
            .checked_add_signed(Duration::days(days_until_monday))?
    } else if now.time() > close {
        now.date_naive().checked_add_signed(Duration::days(1))?
    } else {
        now.date_naive()
    };

    let (h, m, s) = OPEN_HMS;
    let open = open_date.and_time(NaiveTime::from_hms_opt(h, m, s)?);
    Some(format!("{} EST", open.format("%Y-%m-%d %H:%M:%S")))
}

fn session_open_time() -> Option<NaiveTime> {
    let (h, m, s) = OPEN_HMS;
    NaiveTime::from_hms_opt(h, m, s)
}

fn session_close_time() -> Option<NaiveTime> {
    let (h, m, s) = CLOSE_HMS;
    NaiveTime::from_hms_opt(h, m, s)
}

/// True when the given instant falls inside the regular trading session.
pub fn is_trading_time(now: DateTime<Tz>) -> bool {
    market_status_at(now).is_open
}
