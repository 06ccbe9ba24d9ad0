//! Wall-clock source for deadlines and account age

use std::sync::atomic::{AtomicI64, Ordering};

use peerpool_common::{Timestamp, SECONDS_PER_DAY};

/// Supplies the current time in Unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// UTC system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(days * SECONDS_PER_DAY);
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
    fn test_manual_clock() {
        let clock = ManualClock::new(1_000);
        clock.advance(5);
        assert_eq!(clock.now(), 1_005);
        clock.advance_days(1);
        assert_eq!(clock.now(), 1_005 + SECONDS_PER_DAY);
        clock.set(7);
        assert_eq!(clock.now(), 7);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
