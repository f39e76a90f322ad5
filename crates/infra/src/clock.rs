//! Clock adapters.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use provreg_core::{Clock, Timestamp};

/// Wall-clock time in Unix seconds.
///
/// Never goes backwards: a wall clock stepped back reports the last value handed out.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: AtomicU64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let previous = self.last.fetch_max(wall, Ordering::SeqCst);
        previous.max(wall)
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move to `at`. Earlier values are ignored.
    pub fn set(&self, at: Timestamp) {
        self.now.fetch_max(at, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Timestamp) -> Timestamp {
        let previous = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(by))
            })
            .unwrap_or_else(|t| t);
        previous.saturating_add(by)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_reports_unix_seconds() {
        let clock = SystemClock::new();
        let now = clock.now();
        assert!(now > 1_600_000_000);
        assert!(clock.now() >= now);
    }

    #[test]
    fn manual_clock_advances_and_never_rewinds() {
        let clock = ManualClock::new(10);
        assert_eq!(clock.now(), 10);
        assert_eq!(clock.advance(5), 15);
        clock.set(12);
        assert_eq!(clock.now(), 15);
        clock.set(100);
        assert_eq!(clock.now(), 100);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a manual clock is non-decreasing under any sequence of moves.
            #[test]
            fn manual_clock_is_monotonic(moves in proptest::collection::vec((any::<bool>(), 0u64..1_000), 0..50)) {
                let clock = ManualClock::new(0);
                let mut last = clock.now();
                for (is_set, value) in moves {
                    if is_set {
                        clock.set(value);
                    } else {
                        clock.advance(value);
                    }
                    let now = clock.now();
                    prop_assert!(now >= last);
                    last = now;
                }
            }
        }
    }
}
