//! Time source used to stamp and expire cache entries

use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Source of the current time for the cache
///
/// Production code uses [`SystemClock`]; tests substitute a clock they can advance.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time via `Utc::now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
