use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// How timestamps are rendered in file reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    /// Local date and time, `%Y-%m-%d %H:%M:%S`
    #[default]
    Datetime,
    /// Whole seconds since the Unix epoch
    Unix,
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datetime => write!(f, "datetime"),
            Self::Unix => write!(f, "unix"),
        }
    }
}

/// Seconds since the Unix epoch, negative for times before it
#[must_use]
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}

/// Formats a timestamp in the requested format
#[must_use]
pub fn format_timestamp(time: SystemTime, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Unix => unix_seconds(time).to_string(),
        TimestampFormat::Datetime => {
            let datetime: DateTime<Local> = time.into();
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        }
    }
}
