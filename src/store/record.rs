use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// One saved score, as it appears in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    /// Name typed by the player; may be empty
    pub user_name: String,
    pub score: u32,
    /// ISO-8601 UTC timestamp, millisecond precision
    pub date: String,
}

impl ScoreRecord {
    pub fn new(user_name: impl Into<String>, score: u32, at: SystemTime) -> Self {
        Self {
            user_name: user_name.into(),
            score,
            date: format_iso8601(unix_millis(at)),
        }
    }
}

/// Location of a record: `scores/{user_id}/{timestamp_millis}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScoreKey {
    pub user_id: String,
    pub timestamp_millis: u64,
}

impl ScoreKey {
    pub fn new(user_id: impl Into<String>, timestamp_millis: u64) -> Self {
        Self {
            user_id: user_id.into(),
            timestamp_millis,
        }
    }

    pub fn at(user_id: impl Into<String>, at: SystemTime) -> Self {
        Self::new(user_id, unix_millis(at))
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scores/{}/{}", self.user_id, self.timestamp_millis)
    }
}

/// Milliseconds since the Unix epoch; clocks before 1970 read as 0
pub fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ` for a Unix timestamp in milliseconds
pub fn format_iso8601(millis: u64) -> String {
    let secs = millis / 1000;
    let ms = millis % 1000;
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
        ms
    )
}

// Proleptic Gregorian date for a day count relative to 1970-01-01
// (Howard Hinnant's days-to-civil algorithm).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
