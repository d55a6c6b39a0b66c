//! 64-square occupancy model
//!
//! Canonical square indexing is rank-major from the top of the board:
//! bit 0 is a8, bit 7 is h8, bit 56 is a1 and bit 63 is h1. Sensor-native
//! indexing may differ; the orientation transform reconciles the two.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board edge length
pub const BOARD_SIZE: u8 = 8;

/// Number of squares on the board
pub const SQUARE_COUNT: u8 = BOARD_SIZE * BOARD_SIZE;

/// One occupancy bit per square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// No square occupied
    pub const EMPTY: Self = Self(0);

    /// Every square occupied
    pub const FULL: Self = Self(u64::MAX);

    /// Wrap a raw 64-bit reading
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether bit `index` is set
    pub const fn bit(self, index: u8) -> bool {
        (self.0 >> index) & 1 == 1
    }

    /// Set bit `index`
    pub fn set(&mut self, index: u8) {
        self.0 |= 1u64 << index;
    }

    /// Clear bit `index`
    pub fn clear(&mut self, index: u8) {
        self.0 &= !(1u64 << index);
    }

    /// Write bit `index` to `value`
    pub fn write(&mut self, index: u8, value: bool) {
        if value {
            self.set(index);
        } else {
            self.clear(index);
        }
    }

    /// Flip bit `index`
    pub fn toggle(&mut self, index: u8) {
        self.0 ^= 1u64 << index;
    }

    /// Number of occupied squares
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether no square is occupied
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Occupancy of a square
    pub const fn is_occupied(self, square: Square) -> bool {
        self.bit(square.index())
    }

    /// Little-endian byte image (byte 0 = bits 0-7)
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Rebuild from a little-endian byte image
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// Byte `n` of the little-endian image, 0 past the end
    pub const fn byte(self, n: u8) -> u8 {
        if n < 8 {
            (self.0 >> (n as u32 * 8)) as u8
        } else {
            0
        }
    }

    /// Occupied squares in index order
    pub fn squares(self) -> Squares {
        Squares(self.0)
    }

    /// Squares that changed between `self` and `next`
    pub const fn diff(self, next: Bitboard) -> BoardDiff {
        BoardDiff {
            added: Bitboard(next.0 & !self.0),
            removed: Bitboard(self.0 & !next.0),
        }
    }
}

impl From<u64> for Bitboard {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<Bitboard> for u64 {
    fn from(board: Bitboard) -> Self {
        board.0
    }
}

/// Renders the board the way the serial console shows it:
///
/// ```text
/// 8 # . . . . . . .
/// ...
/// 1 . . . . . . . #
///   A B C D E F G H
/// ```
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..SQUARE_COUNT {
            if index % BOARD_SIZE == 0 {
                write!(f, "{} ", (SQUARE_COUNT - index) / BOARD_SIZE)?;
            }
            f.write_str(if self.bit(index) { "# " } else { ". " })?;
            if (index + 1) % BOARD_SIZE == 0 {
                f.write_str("\n")?;
            }
        }
        f.write_str("  ")?;
        for file in b'A'..=b'H' {
            write!(f, "{} ", file as char)?;
        }
        Ok(())
    }
}

/// Iterator over occupied squares
#[derive(Debug, Clone)]
pub struct Squares(u64);

impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Square(index))
    }
}

/// Squares that became occupied or empty between two readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardDiff {
    /// Newly occupied squares
    pub added: Bitboard,
    /// Newly vacated squares
    pub removed: Bitboard,
}

impl BoardDiff {
    /// Whether nothing changed
    pub const fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Canonical square index (0 = a8 .. 63 = h1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Square from a bit index, `None` past 63
    pub const fn new(index: u8) -> Option<Self> {
        if index < SQUARE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Square from a zero-based file (0 = A) and one-based rank (1..=8)
    pub const fn from_file_rank(file: u8, rank: u8) -> Option<Self> {
        if file >= BOARD_SIZE || rank == 0 || rank > BOARD_SIZE {
            return None;
        }
        Some(Self((BOARD_SIZE - rank) * BOARD_SIZE + file))
    }

    /// Parse algebraic notation such as `e2` or `E2`
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            b @ b'A'..=b'H' => b - b'A',
            _ => return None,
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => b - b'0',
            _ => return None,
        };
        Self::from_file_rank(file, rank)
    }

    /// Bit index
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Zero-based file (0 = A)
    pub const fn file(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// One-based rank (1..=8)
    pub const fn rank(self) -> u8 {
        BOARD_SIZE - self.0 / BOARD_SIZE
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_square_corners() {
        assert_eq!(Square::parse("a8").map(Square::index), Some(0));
        assert_eq!(Square::parse("h8").map(Square::index), Some(7));
        assert_eq!(Square::parse("a1").map(Square::index), Some(56));
        assert_eq!(Square::parse("h1").map(Square::index), Some(63));
        assert_eq!(Square::parse("E2").map(Square::index), Some(52));
    }

    #[test]
    fn test_square_rejects_garbage() {
        assert_eq!(Square::parse(""), None);
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::parse("a0"), None);
        assert_eq!(Square::parse("e22"), None);
        assert_eq!(Square::new(64), None);
    }

    #[test]
    fn test_square_file_rank() {
        let sq = Square::from_file_rank(4, 2).unwrap();
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 2);

        let mut name: heapless::String<4> = heapless::String::new();
        write!(name, "{}", sq).unwrap();
        assert_eq!(name.as_str(), "e2");
    }

    #[test]
    fn test_little_endian_bytes() {
        let board = Bitboard::new(0x0000_0000_0000_00FF);
        assert_eq!(board.byte(0), 0xFF);
        for n in 1..8 {
            assert_eq!(board.byte(n), 0);
        }
        assert_eq!(board.byte(8), 0);
        assert_eq!(board.to_le_bytes()[0], 0xFF);
        assert_eq!(Bitboard::from_le_bytes(board.to_le_bytes()), board);
    }

    #[test]
    fn test_diff() {
        let before = Bitboard::new(0b0011);
        let after = Bitboard::new(0b0110);
        let diff = before.diff(after);
        assert_eq!(diff.added, Bitboard::new(0b0100));
        assert_eq!(diff.removed, Bitboard::new(0b0001));
        assert!(before.diff(before).is_empty());
    }

    #[test]
    fn test_squares_iter() {
        let mut board = Bitboard::EMPTY;
        board.set(3);
        board.set(60);
        let mut it = board.squares();
        assert_eq!(it.next().map(Square::index), Some(3));
        assert_eq!(it.next().map(Square::index), Some(60));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_render() {
        let mut board = Bitboard::EMPTY;
        board.set(0); // a8
        board.set(63); // h1

        let mut out: heapless::String<256> = heapless::String::new();
        write!(out, "{}", board).unwrap();

        let mut lines = out.as_str().lines();
        assert_eq!(lines.next(), Some("8 # . . . . . . . "));
        assert_eq!(lines.nth(6), Some("1 . . . . . . . # "));
        assert_eq!(lines.next(), Some("  A B C D E F G H "));
    }

    #[test]
    fn test_render_fits_console_line_buffer() {
        // console prints each board into a 256-byte buffer with a blank line after
        let mut out: heapless::String<256> = heapless::String::new();
        write!(out, "{}\r\n\r\n", Bitboard::FULL).unwrap();
        assert_eq!(out.matches('#').count(), 64);
        assert!(out.ends_with("H \r\n\r\n"));
    }
}
