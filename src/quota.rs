//! Daily quota and request spacing.
//!
//! The counter lives behind [`QuotaTracker`] so it can be shared between
//! clients. Reserving a slot is a single get-and-increment, so concurrent
//! callers cannot push the count past the ceiling.

use crate::config::QuotaConfig;
use crate::error::RecipeApiError;
use log::{debug, warn};
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::{Duration, Instant};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Snapshot of quota usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub requests_today: u32,
    pub window_started_at: Option<Instant>,
    pub last_request_at: Option<Instant>,
}

/// Outcome of a reservation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Slot reserved; carries the count including this request
    Granted(u32),
    /// Ceiling reached; carries the current count
    Exhausted(u32),
}

/// Backing store for quota counters
pub trait QuotaTracker: Send + Sync {
    /// Atomically reserve one request slot unless `limit` is reached
    fn try_reserve(&self, limit: u32) -> Reservation;

    /// Time of the most recent request
    fn last_request_at(&self) -> Option<Instant>;

    /// Record that a request is being sent at `at`
    fn stamp(&self, at: Instant);

    fn snapshot(&self) -> QuotaState;
}

/// In-process tracker with a day window that starts at the first request
#[derive(Debug)]
pub struct MemoryQuotaTracker {
    state: Mutex<QuotaState>,
    window: Duration,
}

impl Default for MemoryQuotaTracker {
    fn default() -> Self {
        Self::with_window(DAY)
    }
}

impl MemoryQuotaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker whose counter resets after `window` instead of a day
    pub fn with_window(window: Duration) -> Self {
        Self {
            state: Mutex::new(QuotaState {
                requests_today: 0,
                window_started_at: None,
                last_request_at: None,
            }),
            window,
        }
    }

    fn roll_window(&self, state: &mut QuotaState, now: Instant) {
        if let Some(started) = state.window_started_at {
            if now.duration_since(started) >= self.window {
                debug!("Quota window elapsed, resetting counter");
                state.requests_today = 0;
                state.window_started_at = None;
            }
        }
    }
}

impl QuotaTracker for MemoryQuotaTracker {
    fn try_reserve(&self, limit: u32) -> Reservation {
        let now = Instant::now();
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.roll_window(&mut state, now);

        if state.requests_today >= limit {
            return Reservation::Exhausted(state.requests_today);
        }
        state.requests_today += 1;
        state.window_started_at.get_or_insert(now);
        Reservation::Granted(state.requests_today)
    }

    fn last_request_at(&self) -> Option<Instant> {
        self.snapshot().last_request_at
    }

    fn stamp(&self, at: Instant) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.last_request_at = Some(at);
    }

    fn snapshot(&self) -> QuotaState {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.roll_window(&mut state, Instant::now());
        *state
    }
}

/// Enforces the daily ceiling and the minimum spacing between requests
#[derive(Clone)]
pub struct QuotaGuard {
    tracker: Arc<dyn QuotaTracker>,
    daily_max: u32,
    min_interval: Duration,
}

impl QuotaGuard {
    pub fn new(config: &QuotaConfig, tracker: Arc<dyn QuotaTracker>) -> Self {
        Self {
            tracker,
            daily_max: config.daily_max,
            min_interval: config.min_interval(),
        }
    }

    /// Reserve a request slot, sleeping until the spacing requirement holds.
    ///
    /// Returns `QuotaExceeded` without waiting when the daily ceiling is
    /// reached.
    pub fn acquire(&self) -> Result<(), RecipeApiError> {
        match self.tracker.try_reserve(self.daily_max) {
            Reservation::Exhausted(used) => {
                warn!("Daily quota exhausted ({}/{})", used, self.daily_max);
                return Err(RecipeApiError::QuotaExceeded {
                    used,
                    limit: self.daily_max,
                });
            }
            Reservation::Granted(count) => {
                debug!("Reserved request {}/{}", count, self.daily_max);
            }
        }

        if let Some(last) = self.tracker.last_request_at() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Throttling for {:?}", wait);
                sleep(wait);
            }
        }
        self.tracker.stamp(Instant::now());
        Ok(())
    }

    pub fn status(&self) -> QuotaState {
        self.tracker.snapshot()
    }

    pub fn daily_max(&self) -> u32 {
        self.daily_max
    }

    /// Requests left in the current window
    pub fn remaining(&self) -> u32 {
        self.daily_max
            .saturating_sub(self.tracker.snapshot().requests_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(daily_max: u32, requests_per_minute: u32) -> QuotaGuard {
        QuotaGuard::new(
            &QuotaConfig {
                daily_max,
                requests_per_minute,
            },
            Arc::new(MemoryQuotaTracker::new()),
        )
    }

    #[test]
    fn test_ceiling_is_enforced() {
        let guard = guard(3, 0);
        for _ in 0..3 {
            guard.acquire().unwrap();
        }
        match guard.acquire() {
            Err(RecipeApiError::QuotaExceeded { used, limit }) => {
                assert_eq!(used, 3);
                assert_eq!(limit, 3);
            }
            other => panic!("expected QuotaExceeded, got {:?}", other),
        }
        assert_eq!(guard.status().requests_today, 3);
        assert_eq!(guard.remaining(), 0);
    }

    #[test]
    fn test_spacing_sleeps_between_requests() {
        // 600 per minute -> 100ms spacing
        let guard = guard(10, 600);
        guard.acquire().unwrap();
        let start = Instant::now();
        guard.acquire().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[test]
    fn test_window_resets_counter() {
        let tracker = MemoryQuotaTracker::with_window(Duration::from_millis(30));
        assert_eq!(tracker.try_reserve(1), Reservation::Granted(1));
        assert_eq!(tracker.try_reserve(1), Reservation::Exhausted(1));
        sleep(Duration::from_millis(50));
        assert_eq!(tracker.try_reserve(1), Reservation::Granted(1));
    }

    #[test]
    fn test_concurrent_reservations_never_exceed_limit() {
        let tracker = Arc::new(MemoryQuotaTracker::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| matches!(tracker.try_reserve(100), Reservation::Granted(_)))
                        .count()
                })
            })
            .collect();
        let granted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(granted, 100);
        assert_eq!(tracker.snapshot().requests_today, 100);
    }

    #[test]
    fn test_exhausted_guard_does_not_stamp() {
        let guard = guard(0, 0);
        assert!(guard.acquire().is_err());
        assert!(guard.status().last_request_at.is_none());
    }
}
