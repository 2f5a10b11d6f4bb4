use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Epoch-millisecond boundary. Documents whose `timeStamp` is strictly below
/// it are purged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Cutoff(i64);

impl Cutoff {
    pub fn from_millis(millis: i64) -> Self {
        Cutoff(millis)
    }

    /// Cutoff `retention_days` whole days before `now`.
    ///
    /// Returns `None` when the result falls outside the range chrono can
    /// represent.
    pub fn from_retention(now: DateTime<Utc>, retention_days: i64) -> Option<Self> {
        let millis = retention_days.checked_mul(MILLIS_PER_DAY)?;
        let retention = TimeDelta::try_milliseconds(millis)?;
        let cutoff = now.checked_sub_signed(retention)?;
        Some(Cutoff(cutoff.timestamp_millis()))
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(at) => write!(f, "{} ({})", self.0, at.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}
