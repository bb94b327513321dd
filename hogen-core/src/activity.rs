//! Organic traffic accounting.
//!
//! Only the request-logging middleware calls [`ActivityTracker::record_activity`].
//! Self-ping requests are filtered out before reaching it, so the counters
//! describe genuine usage rather than keep-alive traffic.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Point-in-time copy of the activity counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySnapshot {
    /// When the last counted request arrived, or process start if none has.
    pub last_activity_at: DateTime<Utc>,
    /// Counted requests since start.
    pub activity_count: u64,
}

impl ActivitySnapshot {
    /// Whole seconds since the last organic request.
    pub fn idle_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_activity_at).num_seconds().max(0)
    }
}

/// Shared, thread-safe activity counters.
#[derive(Debug)]
pub struct ActivityTracker {
    state: Mutex<ActivitySnapshot>,
}

impl ActivityTracker {
    /// Tracker whose idle clock starts now.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Tracker whose idle clock starts at `at`.
    pub fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            state: Mutex::new(ActivitySnapshot {
                last_activity_at: at,
                activity_count: 0,
            }),
        }
    }

    /// Count one organic request.
    pub fn record_activity(&self) {
        let mut state = self.state.lock();
        state.activity_count += 1;
        state.last_activity_at = Utc::now();
    }

    /// Copy of the current counters.
    pub fn snapshot(&self) -> ActivitySnapshot {
        *self.state.lock()
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
