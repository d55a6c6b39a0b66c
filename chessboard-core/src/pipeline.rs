//! Acquisition pipeline
//!
//! One `poll` is one pass of Sampler → Filter → Transform → Publisher.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::bitboard::Bitboard;
use crate::debounce::StabilityFilter;
use crate::orientation::Orientation;
use crate::snapshot::ChangePublisher;
use crate::traits::BoardSampler;

/// Polling-loop side of the board
pub struct Pipeline<'a, S: BoardSampler, M: RawMutex> {
    sampler: S,
    filter: StabilityFilter,
    orientation: Orientation,
    publisher: ChangePublisher<'a, M>,
}

impl<'a, S: BoardSampler, M: RawMutex> Pipeline<'a, S, M> {
    pub fn new(
        sampler: S,
        filter: StabilityFilter,
        orientation: Orientation,
        publisher: ChangePublisher<'a, M>,
    ) -> Self {
        Self {
            sampler,
            filter,
            orientation,
            publisher,
        }
    }

    /// Run one pass
    ///
    /// `now_ms` is a wrapping millisecond clock. Returns the normalized
    /// board when a new snapshot was published.
    pub fn poll(&mut self, now_ms: u32) -> Option<Bitboard> {
        let raw = self.sampler.sample();
        let committed = self.filter.observe(raw, now_ms)?;
        let normalized = self.orientation.normalize(committed);
        if self.publisher.publish(normalized) {
            Some(normalized)
        } else {
            None
        }
    }

    /// Last published board
    pub fn published(&self) -> Bitboard {
        self.publisher.last()
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::FilterPolicy;
    use crate::orientation::Rotation;
    use crate::snapshot::SharedSnapshot;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    struct MockSampler {
        board: Bitboard,
        calls: usize,
    }

    impl BoardSampler for MockSampler {
        fn sample(&mut self) -> Bitboard {
            self.calls += 1;
            self.board
        }
    }

    #[test]
    fn test_poll_publishes_after_dwell() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let sampler = MockSampler {
            board: Bitboard::new(1),
            calls: 0,
        };
        let mut pipeline = Pipeline::new(
            sampler,
            StabilityFilter::new(FilterPolicy::Dwell { dwell_ms: 50 }),
            Orientation::new(Rotation::Deg90, false),
            ChangePublisher::new(&shared),
        );

        assert_eq!(pipeline.poll(10), None);
        assert_eq!(pipeline.poll(60), None);
        assert_eq!(pipeline.poll(61), Some(Bitboard::new(1 << 7)));
        assert_eq!(pipeline.poll(200), None);

        assert_eq!(shared.load().board, Bitboard::new(1 << 7));
        assert_eq!(pipeline.published(), Bitboard::new(1 << 7));
        assert_eq!(pipeline.sampler_mut().calls, 4);
    }

    #[test]
    fn test_identical_commit_does_not_republish() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut pipeline = Pipeline::new(
            MockSampler {
                board: Bitboard::new(3),
                calls: 0,
            },
            StabilityFilter::new(FilterPolicy::Passthrough),
            Orientation::IDENTITY,
            ChangePublisher::new(&shared),
        );

        assert_eq!(pipeline.poll(0), Some(Bitboard::new(3)));
        assert!(shared.take_dirty());
        assert_eq!(pipeline.poll(1), None);
        assert!(!shared.load().dirty);
    }
}
