//! Sensor sampler capability

use crate::bitboard::{Bitboard, SQUARE_COUNT};

/// Produces one raw occupancy reading per call
///
/// Implementations scan the sensor hardware (shift registers, a GPIO
/// matrix, a multiplexed Hall array, or a simulated board). Sampling has
/// no error channel: a misread is just a spurious board that the
/// stability filter absorbs. A call must finish within a bounded time
/// since it runs on the polling loop.
pub trait BoardSampler {
    /// Take one reading in sensor-native bit order
    fn sample(&mut self) -> Bitboard;
}

impl<T: BoardSampler + ?Sized> BoardSampler for &mut T {
    fn sample(&mut self) -> Bitboard {
        (**self).sample()
    }
}

/// Assembles a raw board during a scan pass
///
/// When `flip` is set, the horizontal flip (`bit i ↔ bit 63 - i`) is
/// folded into bit assignment so the sampler emits the flipped board
/// directly instead of reversing it afterwards.
#[derive(Debug, Clone, Copy)]
pub struct ScanBuilder {
    board: Bitboard,
    flip: bool,
}

impl ScanBuilder {
    /// Start an empty pass
    pub const fn new(flip: bool) -> Self {
        Self {
            board: Bitboard::EMPTY,
            flip,
        }
    }

    /// Mark scan position `index` as occupied
    pub fn set(&mut self, index: u8) {
        debug_assert!(index < SQUARE_COUNT);
        let target = if self.flip {
            SQUARE_COUNT - 1 - index
        } else {
            index
        };
        self.board.set(target);
    }

    /// Write scan position `index`
    pub fn write(&mut self, index: u8, occupied: bool) {
        if occupied {
            self.set(index);
        }
    }

    /// OR a whole scan row (`row * 8 ..= row * 8 + 7`), bit 0 of `byte`
    /// being column 0
    pub fn set_row(&mut self, row: u8, byte: u8) {
        for col in 0..8 {
            self.write(row * 8 + col, (byte >> col) & 1 == 1);
        }
    }

    /// The assembled board
    pub const fn finish(self) -> Bitboard {
        self.board
    }
}
