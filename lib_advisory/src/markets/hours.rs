//! # NSE Trading Hours
//!
//! Session classification for the National Stock Exchange of India:
//! Monday through Friday, 09:15 to 15:30 IST. Exchange holidays are not
//! tracked; a holiday weekday reads as "open".

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Asia::Kolkata;

/// Session open: 09:15 IST, in minutes since midnight.
const SESSION_OPEN_MINUTES: u32 = 9 * 60 + 15;
/// Session close: 15:30 IST, in minutes since midnight.
const SESSION_CLOSE_MINUTES: u32 = 15 * 60 + 30;

/// Whether the NSE cash session is open at the given instant.
pub fn is_market_open_at(instant: DateTime<Utc>) -> bool {
    let ist = instant.with_timezone(&Kolkata);

    let is_weekday = !matches!(ist.weekday(), Weekday::Sat | Weekday::Sun);
    let minute_of_day = ist.hour() * 60 + ist.minute();

    is_weekday && (SESSION_OPEN_MINUTES..=SESSION_CLOSE_MINUTES).contains(&minute_of_day)
}

/// Whether the NSE cash session is open right now.
pub fn is_market_open() -> bool {
    is_market_open_at(Utc::now())
}

/// The operator-facing status string for a session state.
pub fn market_status_label(open: bool) -> &'static str {
    if open {
        "MARKET LIVE"
    } else {
        "MARKET CLOSED"
    }
}
