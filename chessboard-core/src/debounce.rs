//! Stability filter
//!
//! Whole-board debouncing: a raw reading is committed only after it has
//! stayed unchanged for longer than the dwell time. Any change on any
//! square restarts the timer for the entire board.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitboard::Bitboard;

/// Dwell time of the reference configuration
pub const DEFAULT_DWELL_MS: u32 = 50;

/// How raw readings become committed boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FilterPolicy {
    /// Commit after the reading has been stable for more than `dwell_ms`
    Dwell { dwell_ms: u32 },
    /// Commit every reading (sensors that do not bounce)
    Passthrough,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        FilterPolicy::Dwell {
            dwell_ms: DEFAULT_DWELL_MS,
        }
    }
}

/// Board-level debouncer
///
/// Time is a wrapping millisecond counter; elapsed time is computed with
/// wrapping subtraction so counter rollover is harmless.
#[derive(Debug, Clone)]
pub struct StabilityFilter {
    policy: FilterPolicy,
    /// Reading currently being timed
    candidate: Bitboard,
    /// When `candidate` was first seen (ms)
    candidate_since_ms: u32,
    /// Last committed reading
    committed: Option<Bitboard>,
}

impl StabilityFilter {
    /// Create a filter timing an empty board from t = 0
    pub const fn new(policy: FilterPolicy) -> Self {
        Self {
            policy,
            candidate: Bitboard::EMPTY,
            candidate_since_ms: 0,
            committed: None,
        }
    }

    /// Feed one raw reading
    ///
    /// Returns the board when a new value is committed. Observations that
    /// would re-commit the value already committed return `None`.
    pub fn observe(&mut self, raw: Bitboard, now_ms: u32) -> Option<Bitboard> {
        match self.policy {
            FilterPolicy::Passthrough => self.commit(raw),
            FilterPolicy::Dwell { dwell_ms } => {
                if raw != self.candidate {
                    self.candidate = raw;
                    self.candidate_since_ms = now_ms;
                }

                if now_ms.wrapping_sub(self.candidate_since_ms) > dwell_ms {
                    self.commit(self.candidate)
                } else {
                    None
                }
            }
        }
    }

    /// Last committed board, if any
    pub fn committed(&self) -> Option<Bitboard> {
        self.committed
    }

    /// Active policy
    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    fn commit(&mut self, board: Bitboard) -> Option<Bitboard> {
        if self.committed == Some(board) {
            return None;
        }
        self.committed = Some(board);
        Some(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DWELL: FilterPolicy = FilterPolicy::Dwell { dwell_ms: 50 };

    #[test]
    fn test_commits_after_dwell() {
        let mut filter = StabilityFilter::new(DWELL);
        let board = Bitboard::new(0xF0);

        assert_eq!(filter.observe(board, 1_000), None);
        assert_eq!(filter.observe(board, 1_050), None); // exactly dwell, not past it
        assert_eq!(filter.observe(board, 1_051), Some(board));
        assert_eq!(filter.observe(board, 1_100), None);
        assert_eq!(filter.committed(), Some(board));
    }

    #[test]
    fn test_change_restarts_timer() {
        let mut filter = StabilityFilter::new(DWELL);
        let a = Bitboard::new(1);
        let b = Bitboard::new(2);

        filter.observe(a, 0);
        assert_eq!(filter.observe(b, 40), None);
        // a would have been stable by now, b has only had 30 ms
        assert_eq!(filter.observe(b, 70), None);
        assert_eq!(filter.observe(b, 91), Some(b));
    }

    #[test]
    fn test_bouncing_never_commits() {
        let mut filter = StabilityFilter::new(DWELL);
        for t in 0..200u32 {
            let raw = Bitboard::new(u64::from(t % 2));
            assert_eq!(filter.observe(raw, t), None);
        }
        assert_eq!(filter.committed(), None);
    }

    #[test]
    fn test_clock_rollover() {
        let mut filter = StabilityFilter::new(DWELL);
        let board = Bitboard::new(7);
        filter.observe(board, u32::MAX - 10);
        assert_eq!(filter.observe(board, 45), Some(board));
    }

    #[test]
    fn test_passthrough_commits_changes_only() {
        let mut filter = StabilityFilter::new(FilterPolicy::Passthrough);
        let a = Bitboard::new(1);
        assert_eq!(filter.observe(a, 0), Some(a));
        assert_eq!(filter.observe(a, 0), None);
        assert_eq!(filter.observe(Bitboard::EMPTY, 0), Some(Bitboard::EMPTY));
    }
}
