//! Clock sources.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Timestamp;

/// Source of the current instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// Reads the operating system's wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Timestamp(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)),
            Err(e) => {
                tracing::warn!("System clock is before the UNIX epoch: {}", e);
                Timestamp(0)
            }
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::Clock;
    use crate::types::Timestamp;

    /// A clock that only moves when told to. Clones share the same instant,
    /// so a test can keep a handle after moving one into an engine.
    #[derive(Debug, Clone, Default)]
    pub struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        pub fn starting_at(at: Timestamp) -> Self {
            ManualClock(Arc::new(AtomicU64::new(at.0)))
        }

        pub fn set(&self, at: Timestamp) {
            self.0.store(at.0, Ordering::SeqCst);
        }

        pub fn advance_secs(&self, secs: u64) {
            self.advance_millis(secs.saturating_mul(1_000));
        }

        pub fn advance_millis(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            Timestamp(self.0.load(Ordering::SeqCst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now() > Timestamp(1_577_836_800_000));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(Timestamp(1_000));
        let handle = clock.clone();
        handle.advance_secs(3);
        assert_eq!(clock.now(), Timestamp(4_000));
        handle.set(Timestamp(7));
        assert_eq!(clock.now(), Timestamp(7));
    }
}
