//! Time source abstraction.
//!
//! Every decision that depends on "now" (lock expiry, week start, countdowns)
//! receives the current instant from a [`Clock`] instead of reading the wall
//! clock, so tests can pin time deterministically.
//!
//! Stored instants are [`Timestamp`]s: milliseconds since the Unix epoch.

use std::sync::RwLock;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Convert into a zoned datetime. Out-of-range values clamp to the epoch.
    pub fn to_datetime<Tz: TimeZone>(self, tz: &Tz) -> DateTime<Tz> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .unwrap_or_default()
            .with_timezone(tz)
    }

    /// Offset this timestamp by a signed number of milliseconds.
    pub const fn offset_millis(self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl<Tz: TimeZone> From<&DateTime<Tz>> for Timestamp {
    fn from(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Resolve a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that do not
/// exist (DST spring-forward gap) are read with the offset in force before the
/// gap, so they land just past it: 02:30 in a 02:00 to 03:00 gap becomes 03:30.
pub(crate) fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before_gap = naive
                .checked_sub_signed(Duration::days(1))
                .and_then(|day_before| tz.offset_from_local_datetime(&day_before).earliest())
                .map(|offset| i64::from(offset.fix().local_minus_utc()));
            match before_gap.and_then(|secs| naive.checked_sub_signed(Duration::seconds(secs))) {
                Some(utc) => tz.from_utc_datetime(&utc),
                None => tz.from_utc_datetime(naive),
            }
        }
    }
}

/// Source of the current instant.
pub trait Clock {
    /// Time zone used for calendar arithmetic (week boundaries, Sunday expiry).
    type Tz: TimeZone;

    /// The current instant in [`Clock::Tz`].
    fn now(&self) -> DateTime<Self::Tz>;

    /// The current instant as a [`Timestamp`].
    fn timestamp(&self) -> Timestamp {
        Timestamp::from(self.now())
    }
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock<Tz: TimeZone> {
    now: RwLock<DateTime<Tz>>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: DateTime<Tz>) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        *guard = now;
    }

    /// Move the clock forward (or backward, for negative deltas).
    pub fn advance(&self, delta: Duration) {
        let mut guard = self.now.write().unwrap_or_else(|e| e.into_inner());
        let next = guard.clone() + delta;
        *guard = next;
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
