//! Time source for day grouping.
//!
//! Day labels and render timestamps depend on "now". Components take a
//! [`Clock`] so tests can pin the current day.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 86_400_000;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time as epoch milliseconds.
    fn now_millis(&self) -> i64;

    /// Start of the current local day as epoch milliseconds.
    fn today_midnight(&self) -> i64;

    /// Start of the local day containing `millis`.
    fn midnight_of(&self, millis: i64) -> i64 {
        let start = DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap_or_default()
            .with_timezone(&Local)
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default();
        local_timestamp(start)
    }

    /// Formats a timestamp as a long date, e.g. `Tuesday, November 14, 2023`.
    fn format_long_date(&self, millis: i64) -> String {
        let date = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
        date.with_timezone(&Local).format("%A, %B %-d, %Y").to_string()
    }
}

fn local_timestamp(start: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&start)
        .earliest()
        .map(|midnight| midnight.timestamp_millis())
        // A DST gap at midnight leaves no local midnight; fall back to UTC.
        .unwrap_or_else(|| start.and_utc().timestamp_millis())
}

/// Clock backed by the system time in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn today_midnight(&self) -> i64 {
        local_timestamp(Local::now().date_naive().and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

/// Clock pinned to fixed instants. Dates are formatted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    /// Value returned by [`Clock::now_millis`].
    pub now: i64,
    /// Value returned by [`Clock::today_midnight`].
    pub midnight: i64,
}

impl FixedClock {
    /// Creates a clock at `now`, deriving midnight in UTC.
    pub fn at(now: i64) -> Self {
        Self {
            now,
            midnight: now - now.rem_euclid(DAY_MILLIS),
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.now
    }

    fn today_midnight(&self) -> i64 {
        self.midnight
    }

    fn midnight_of(&self, millis: i64) -> i64 {
        millis - millis.rem_euclid(DAY_MILLIS)
    }

    fn format_long_date(&self, millis: i64) -> String {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .unwrap_or_default()
            .format("%A, %B %-d, %Y")
            .to_string()
    }
}

/// Current local midnight as epoch milliseconds.
pub fn today_midnight() -> i64 {
    SystemClock.today_midnight()
}

/// Formats epoch milliseconds as an ISO-8601 UTC string with millisecond
/// precision, e.g. `2023-11-14T22:13:20.000Z`.
pub fn to_iso_string(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
