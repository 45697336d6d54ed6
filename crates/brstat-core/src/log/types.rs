use chrono::NaiveTime;
use std::fmt;

/// Milliseconds since midnight, rebuilt from a logcat `HH:MM:SS.mmm` header.
///
/// Logcat headers carry no year, so every timestamp of a capture is assumed
/// to fall on the same day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimestampMs(pub i64);

impl TimestampMs {
    /// `None` when the fields do not fit in an `i64` millisecond count
    pub fn from_hms_milli(hour: i64, minute: i64, second: i64, millisecond: i64) -> Option<Self> {
        let millis = hour
            .checked_mul(3_600_000)?
            .checked_add(minute.checked_mul(60_000)?)?
            .checked_add(second.checked_mul(1_000)?)?
            .checked_add(millisecond)?;
        Some(Self(millis))
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Signed number of milliseconds from `earlier` to `self`
    pub fn millis_since(self, earlier: TimestampMs) -> i64 {
        self.0 - earlier.0
    }

    /// Time of day, if the value is inside a single day
    pub fn to_time(self) -> Option<NaiveTime> {
        let secs = u32::try_from(self.0.div_euclid(1_000)).ok()?;
        let nanos = u32::try_from(self.0.rem_euclid(1_000) * 1_000_000).ok()?;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
    }
}

impl fmt::Display for TimestampMs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_time() {
            Some(time) => write!(f, "{}", time.format("%H:%M:%S%.3f")),
            None => write!(f, "{} ms", self.0),
        }
    }
}

/// A bitrate change: `value` holds from `timestamp` until the next sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateSample {
    pub timestamp: TimestampMs,
    pub value: i64,
}

/// Everything extracted from one log file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleLog {
    /// Samples in file order
    pub samples: Vec<BitrateSample>,
    /// Timestamp of the last line of the file
    pub final_timestamp: TimestampMs,
}
