//! Rolling STAN (System Trace Audit Number) counter.
//!
//! A monotonic integer generator bounded by `[lo, hi]`, wrapping to `lo`
//! after `hi`. Mutations are atomic so many concurrent `Send` calls can pull
//! a fresh STAN without contending on a mutex.

use std::sync::atomic::{AtomicU32, Ordering};

/// Default lower bound, matching common ISO 8583 STAN ranges.
pub const DEFAULT_LO: u32 = 1;
/// Default upper bound (field 11 is 6 ASCII digits).
pub const DEFAULT_HI: u32 = 999_999;

/// Thread-safe rolling counter in `[lo, hi]`.
#[derive(Debug)]
pub struct StanCounter {
    lo: u32,
    hi: u32,
    current: AtomicU32,
}

impl StanCounter {
    /// Create a counter bounded by `[lo, hi]`, starting just below `lo` so
    /// the first `next()` call returns `lo`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    #[must_use]
    pub fn new(lo: u32, hi: u32) -> Self {
        assert!(lo <= hi, "StanCounter: lo ({lo}) must not exceed hi ({hi})");
        Self { lo, hi, current: AtomicU32::new(lo.wrapping_sub(1)) }
    }

    /// Return the next value in `[lo, hi]`, wrapping to `lo` after `hi`.
    pub fn next(&self) -> u32 {
        let mut produced = self.lo;
        let _ = self.current.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
            produced = if v >= self.hi { self.lo } else { v + 1 };
            Some(produced)
        });
        produced
    }
}

impl Default for StanCounter {
    fn default() -> Self {
        Self::new(DEFAULT_LO, DEFAULT_HI)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_lo() {
        let stan = StanCounter::new(1, 5);
        assert_eq!(stan.next(), 1);
        assert_eq!(stan.next(), 2);
    }

    #[test]
    fn wraps_after_hi() {
        let stan = StanCounter::new(1, 3);
        assert_eq!(stan.next(), 1);
        assert_eq!(stan.next(), 2);
        assert_eq!(stan.next(), 3);
        assert_eq!(stan.next(), 1);
    }

    #[test]
    fn concurrent_callers_never_see_duplicates_within_one_cycle() {
        let stan = Arc::new(StanCounter::new(1, 1000));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let stan = Arc::clone(&stan);
                std::thread::spawn(move || (0..50).map(|_| stan.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u32> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 800, "no duplicate STANs within one full cycle");
    }
}
