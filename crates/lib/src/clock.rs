//! Time provider abstraction
//!
//! This module provides a [`Clock`] trait that abstracts over time sources,
//! so the date validators (`past`, `future`, `ageRange`) can run against real
//! system time in production and a controllable time in tests.
//!
//! # Example
//!
//! ```
//! use formkit::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now();
//! assert!(clock.now_millis() >= now.and_utc().timestamp_millis());
//! ```

use std::fmt::Debug;

use chrono::{DateTime, NaiveDateTime};

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

/// A time provider for getting the current instant.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> i64;

    /// Returns the current time as a naive UTC date-time.
    ///
    /// Form dates carry no time zone, so they are compared against UTC.
    fn now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.now_millis())
            .map(|dt| dt.naive_utc())
            .unwrap_or_default()
    }
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Test clock frozen at a settable instant.
///
/// # Example
///
/// ```
/// use formkit::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1000);
/// assert_eq!(clock.now_millis(), 1000);
/// clock.advance(500);
/// assert_eq!(clock.now_millis(), 1500);
/// ```
#[cfg(any(test, feature = "testing"))]
pub struct FixedClock {
    millis: Mutex<i64>,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a new fixed clock at the given time in milliseconds.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Mutex::new(millis),
        }
    }

    /// Create a fixed clock at the given date-time, read as UTC.
    pub fn at(instant: NaiveDateTime) -> Self {
        Self::new(instant.and_utc().timestamp_millis())
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: i64) {
        *self.millis.lock().unwrap() += ms;
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, ms: i64) {
        *self.millis.lock().unwrap() = ms;
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        *self.millis.lock().unwrap()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Debug for FixedClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedClock")
            .field("millis", &*self.millis.lock().unwrap())
            .finish()
    }
}
