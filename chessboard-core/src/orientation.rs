//! Orientation transform
//!
//! Reconciles the sensor wiring layout with the canonical board frame.
//! The 64 bits are treated as an 8×8 row-major matrix. One quarter turn
//! is a transpose followed by reversing every row; 180° and 270° are two
//! and three quarter turns applied in sequence. The flip reverses the bit
//! index (`i ↔ 63 - i`) and, when enabled, is applied before rotation.

use crate::bitboard::{Bitboard, BOARD_SIZE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation amount, clockwise in quarter turns of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation for a whole number of degrees (0, 90, 180, 270)
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Rotation in degrees
    pub const fn degrees(self) -> u16 {
        self.quarter_turns() as u16 * 90
    }

    /// Number of 90° steps
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }
}

/// Rotation and flip applied to every committed board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation {
    pub rotation: Rotation,
    pub flip: bool,
}

impl Orientation {
    /// No rotation, no flip
    pub const IDENTITY: Self = Self {
        rotation: Rotation::None,
        flip: false,
    };

    pub const fn new(rotation: Rotation, flip: bool) -> Self {
        Self { rotation, flip }
    }

    /// Same rotation with the flip dropped
    ///
    /// Used when the sampler already folds the flip into its scan.
    pub const fn without_flip(self) -> Self {
        Self {
            rotation: self.rotation,
            flip: false,
        }
    }

    /// Map a committed board into the canonical frame
    pub fn normalize(&self, board: Bitboard) -> Bitboard {
        let board = if self.flip { flip(board) } else { board };
        rotate(board, self.rotation)
    }
}

/// Reverse the bit index (`i ↔ 63 - i`)
pub const fn flip(board: Bitboard) -> Bitboard {
    Bitboard::new(board.bits().reverse_bits())
}

/// Apply `rotation` as repeated quarter turns
pub fn rotate(board: Bitboard, rotation: Rotation) -> Bitboard {
    let mut board = board;
    for _ in 0..rotation.quarter_turns() {
        board = rotate_90(board);
    }
    board
}

/// One quarter turn: transpose, then reverse each row
pub fn rotate_90(board: Bitboard) -> Bitboard {
    let n = BOARD_SIZE;
    let mut board = board;

    for i in 0..n {
        for j in (i + 1)..n {
            swap_bits(&mut board, i * n + j, j * n + i);
        }
    }

    for i in 0..n {
        for j in 0..n / 2 {
            swap_bits(&mut board, i * n + j, i * n + (n - 1 - j));
        }
    }

    board
}

fn swap_bits(board: &mut Bitboard, a: u8, b: u8) {
    let bit_a = board.bit(a);
    let bit_b = board.bit(b);
    board.write(a, bit_b);
    board.write(b, bit_a);
}
