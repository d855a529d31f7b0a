//! Wall-clock abstraction.
//!
//! The timer engine never reads the system clock directly. It holds a
//! [`Clock`] capability, so tests can drive time deterministically and the
//! host can substitute a monotonic source if it wants one.

use std::sync::Mutex;

/// Source of current wall-clock time in epoch milliseconds.
///
/// The clock may jump arbitrarily between reads (device suspended, NTP
/// correction, user changed the time). Consumers must derive elapsed time
/// from a stored start instant and a fresh read, never by accumulating
/// deltas.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// The process wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

/// A settable clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Mutex<i64>,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Mutex::new(now_ms),
        }
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now_ms: i64) {
        *self.lock() = now_ms;
    }

    /// Move time forward (or backward, with a negative delta).
    pub fn advance(&self, delta_ms: i64) {
        *self.lock() += delta_ms;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, i64> {
        self.now_ms.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        *self.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(10_000);
        assert_eq!(clock.now_ms(), 10_000);
    }

    #[test]
    fn system_clock_is_nonzero() {
        assert!(SystemClock.now_ms() > 0);
    }
}
