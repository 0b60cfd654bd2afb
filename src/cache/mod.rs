//! Cache module for memoizing API responses on disk
//!
//! This module provides a cache manager that persists API responses to the filesystem
//! with a TTL (time-to-live) per entry. Expired, missing and corrupted entries all read
//! back as a miss, so callers can always fall back to a live fetch.

mod clock;
mod manager;

pub use clock::{Clock, SystemClock};
pub use manager::{CacheError, CacheManager, Lookup};
