//! Shared snapshot and change publisher
//!
//! The snapshot is the only state shared between the polling loop (sole
//! writer of the board value) and the bus target context (reader, and
//! sole consumer of the dirty flag). Every access runs inside the blocking
//! mutex, so the value and flag are always seen as a pair.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::bitboard::Bitboard;

/// Published board and its pending-change flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub board: Bitboard,
    /// Set on publish, cleared when the master reads the flag register
    pub dirty: bool,
}

/// Snapshot behind a critical section
///
/// With `CriticalSectionRawMutex` this can live in a `static` and be
/// touched from both thread mode and an interrupt-priority executor.
pub struct SharedSnapshot<M: RawMutex> {
    inner: Mutex<M, Cell<Snapshot>>,
}

impl<M: RawMutex> Default for SharedSnapshot<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SharedSnapshot<M> {
    /// Empty board, nothing pending
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Snapshot {
                board: Bitboard::EMPTY,
                dirty: false,
            })),
        }
    }

    /// Replace the board and raise the flag as one step
    pub fn publish(&self, board: Bitboard) {
        self.inner
            .lock(|cell| cell.set(Snapshot { board, dirty: true }));
    }

    /// Copy of the current snapshot
    pub fn load(&self) -> Snapshot {
        self.inner.lock(|cell| cell.get())
    }

    /// Byte `n` of the current board (little-endian)
    pub fn board_byte(&self, n: u8) -> u8 {
        self.inner.lock(|cell| cell.get().board.byte(n))
    }

    /// Read and clear the pending-change flag as one step
    pub fn take_dirty(&self) -> bool {
        self.inner.lock(|cell| {
            let snapshot = cell.get();
            cell.set(Snapshot {
                dirty: false,
                ..snapshot
            });
            snapshot.dirty
        })
    }

    /// Raise the pending-change flag again without touching the board
    pub fn restore_dirty(&self) {
        self.inner.lock(|cell| {
            cell.set(Snapshot {
                dirty: true,
                ..cell.get()
            })
        });
    }
}

/// Publishes normalized boards that differ from the last one published
///
/// Owned by the polling loop. It compares against its own copy of the
/// last published value, never against the shared snapshot, so clearing
/// the flag on the bus side cannot cause a republish.
pub struct ChangePublisher<'a, M: RawMutex> {
    snapshot: &'a SharedSnapshot<M>,
    last: Bitboard,
}

impl<'a, M: RawMutex> ChangePublisher<'a, M> {
    pub const fn new(snapshot: &'a SharedSnapshot<M>) -> Self {
        Self {
            snapshot,
            last: Bitboard::EMPTY,
        }
    }

    /// Publish `board` if it changed; returns whether it did
    pub fn publish(&mut self, board: Bitboard) -> bool {
        if board == self.last {
            return false;
        }
        self.last = board;
        self.snapshot.publish(board);
        true
    }

    /// Last value handed to the snapshot
    pub fn last(&self) -> Bitboard {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_publish_sets_dirty_once() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut publisher = ChangePublisher::new(&shared);
        let board = Bitboard::new(0x00FF);

        assert!(publisher.publish(board));
        assert_eq!(shared.load(), Snapshot { board, dirty: true });

        assert!(shared.take_dirty());
        assert!(!publisher.publish(board));
        assert!(!shared.load().dirty);
    }

    #[test]
    fn test_take_dirty_clears() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(5));
        assert!(shared.take_dirty());
        assert!(!shared.take_dirty());
        assert_eq!(shared.load().board, Bitboard::new(5));
    }

    #[test]
    fn test_restore_dirty_keeps_board() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(0xFF));
        assert!(shared.take_dirty());

        shared.restore_dirty();
        assert_eq!(
            shared.load(),
            Snapshot {
                board: Bitboard::new(0xFF),
                dirty: true
            }
        );
    }

    #[test]
    fn test_empty_board_is_not_a_change() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut publisher = ChangePublisher::new(&shared);
        assert!(!publisher.publish(Bitboard::EMPTY));
        assert!(!shared.load().dirty);
    }

    #[test]
    fn test_board_bytes() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(0x0807_0605_0403_0201));
        for n in 0..8 {
            assert_eq!(shared.board_byte(n), n + 1);
        }
    }
}
