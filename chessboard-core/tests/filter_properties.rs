//! Stability filter and change publisher properties.

use chessboard_core::debounce::DEFAULT_DWELL_MS;
use chessboard_core::{
    Bitboard, ChangePublisher, FilterPolicy, SharedSnapshot, StabilityFilter,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use proptest::prelude::*;

const DWELL: FilterPolicy = FilterPolicy::Dwell {
    dwell_ms: DEFAULT_DWELL_MS,
};

proptest! {
    /// Boards that change every cycle, each held for no longer than the
    /// dwell time, never commit.
    #[test]
    fn short_lived_boards_never_commit(
        start in any::<u32>(),
        steps in proptest::collection::vec(1u32..=DEFAULT_DWELL_MS, 1..64),
    ) {
        let mut filter = StabilityFilter::new(DWELL);
        // Seed away from the initial empty candidate
        let mut now = start;
        let mut board = 1u64;

        for step in steps {
            prop_assert_eq!(filter.observe(Bitboard::new(board), now), None);
            now = now.wrapping_add(step);
            board += 1;
        }
        prop_assert_eq!(filter.committed(), None);
    }

    /// A board held steady past the dwell time commits exactly once.
    #[test]
    fn steady_board_commits_once(
        bits in 1u64..,
        start in any::<u32>(),
        extra in proptest::collection::vec(0u32..200, 1..32),
    ) {
        let board = Bitboard::new(bits);
        let mut filter = StabilityFilter::new(DWELL);
        prop_assert_eq!(filter.observe(board, start), None);

        let mut now = start.wrapping_add(DEFAULT_DWELL_MS + 1);
        prop_assert_eq!(filter.observe(board, now), Some(board));

        for step in extra {
            now = now.wrapping_add(step);
            prop_assert_eq!(filter.observe(board, now), None);
        }
        prop_assert_eq!(filter.committed(), Some(board));
    }

    /// Publishing the same board repeatedly raises the flag only once.
    #[test]
    fn repeated_publish_raises_flag_once(bits in 1u64.., repeats in 1usize..8) {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut publisher = ChangePublisher::new(&shared);
        let board = Bitboard::new(bits);

        prop_assert!(publisher.publish(board));
        prop_assert!(shared.take_dirty());
        for _ in 0..repeats {
            prop_assert!(!publisher.publish(board));
        }
        prop_assert!(!shared.take_dirty());
        prop_assert_eq!(shared.load().board, board);
    }
}

#[test]
fn single_bouncing_square_holds_the_whole_board() {
    let mut filter = StabilityFilter::new(DWELL);
    let settled = Bitboard::new(0xFF00);
    let bouncing = Bitboard::new(0xFF01);

    let mut now = 0;
    for i in 0..20 {
        let raw = if i % 2 == 0 { settled } else { bouncing };
        assert_eq!(filter.observe(raw, now), None);
        now += 10;
    }

    filter.observe(settled, now);
    assert_eq!(filter.observe(settled, now + DEFAULT_DWELL_MS + 1), Some(settled));
}
