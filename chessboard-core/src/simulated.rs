//! Simulated board
//!
//! Stands in for sensor hardware on the bench. Squares are toggled from
//! the serial console and sampled like a real board; the stored value is
//! already canonical.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::bitboard::{Bitboard, Square};
use crate::traits::BoardSampler;

/// Occupancy set by hand
pub struct SimulatedBoard<M: RawMutex> {
    board: Mutex<M, Cell<Bitboard>>,
}

impl<M: RawMutex> Default for SimulatedBoard<M> {
    fn default() -> Self {
        Self::new(Bitboard::EMPTY)
    }
}

impl<M: RawMutex> SimulatedBoard<M> {
    pub const fn new(initial: Bitboard) -> Self {
        Self {
            board: Mutex::new(Cell::new(initial)),
        }
    }

    /// Flip one square, returning whether it is now occupied
    pub fn toggle(&self, square: Square) -> bool {
        self.board.lock(|cell| {
            let mut board = cell.get();
            board.toggle(square.index());
            cell.set(board);
            board.is_occupied(square)
        })
    }

    /// Replace the whole board
    pub fn set(&self, board: Bitboard) {
        self.board.lock(|cell| cell.set(board));
    }

    /// Current value
    pub fn board(&self) -> Bitboard {
        self.board.lock(|cell| cell.get())
    }
}

impl<M: RawMutex> BoardSampler for &SimulatedBoard<M> {
    fn sample(&mut self) -> Bitboard {
        self.board()
    }
}

/// Parse a console toggle command such as `e2` or `H8`
///
/// Accepts a file letter followed by a rank digit, surrounding whitespace
/// ignored.
pub fn parse_toggle_command(line: &str) -> Option<Square> {
    Square::parse(line)
}
