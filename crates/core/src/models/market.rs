use serde::{Deserialize, Serialize};

/// Current state of the US equity market clock.
///
/// Computed on demand from wall-clock time, never cached or stored.
/// `next_open` is a formatted `"%Y-%m-%d %H:%M:%S EST"` string, or the
/// literal `"Unknown"` if the calendar arithmetic fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub is_open: bool,
    pub is_weekday: bool,

    /// Current US-Eastern time of day, `"%H:%M:%S EST"`.
    pub current_time: String,

    pub next_open: String,
}
