//! Algebraic properties of the orientation transform.

use chessboard_core::orientation::{flip, rotate, rotate_90};
use chessboard_core::{Bitboard, Orientation, Rotation, ScanBuilder};
use proptest::prelude::*;

/// 180° computed directly: (r, c) -> (7 - r, 7 - c)
fn rotate_180_table(board: Bitboard) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    for r in 0..8u8 {
        for c in 0..8u8 {
            if board.bit(r * 8 + c) {
                out.set((7 - r) * 8 + (7 - c));
            }
        }
    }
    out
}

/// 270° computed directly: (r, c) -> (7 - c, r)
fn rotate_270_table(board: Bitboard) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    for r in 0..8u8 {
        for c in 0..8u8 {
            if board.bit(r * 8 + c) {
                out.set((7 - c) * 8 + r);
            }
        }
    }
    out
}

/// 90° computed directly: (r, c) -> (c, 7 - r)
fn rotate_90_table(board: Bitboard) -> Bitboard {
    let mut out = Bitboard::EMPTY;
    for r in 0..8u8 {
        for c in 0..8u8 {
            if board.bit(r * 8 + c) {
                out.set(c * 8 + (7 - r));
            }
        }
    }
    out
}

fn arb_rotation() -> impl Strategy<Value = Rotation> {
    prop_oneof![
        Just(Rotation::None),
        Just(Rotation::Deg90),
        Just(Rotation::Deg180),
        Just(Rotation::Deg270),
    ]
}

proptest! {
    #[test]
    fn four_quarter_turns_are_identity(bits in any::<u64>()) {
        let board = Bitboard::new(bits);
        let turned = rotate_90(rotate_90(rotate_90(rotate_90(board))));
        prop_assert_eq!(turned, board);
    }

    #[test]
    fn quarter_turn_matches_table(bits in any::<u64>()) {
        let board = Bitboard::new(bits);
        prop_assert_eq!(rotate_90(board), rotate_90_table(board));
    }

    #[test]
    fn half_turn_is_two_quarter_turns(bits in any::<u64>()) {
        let board = Bitboard::new(bits);
        prop_assert_eq!(rotate(board, Rotation::Deg180), rotate_90(rotate_90(board)));
        prop_assert_eq!(rotate(board, Rotation::Deg180), rotate_180_table(board));
    }

    #[test]
    fn three_quarter_turn_is_three_quarter_turns(bits in any::<u64>()) {
        let board = Bitboard::new(bits);
        prop_assert_eq!(
            rotate(board, Rotation::Deg270),
            rotate_90(rotate_90(rotate_90(board)))
        );
        prop_assert_eq!(rotate(board, Rotation::Deg270), rotate_270_table(board));
    }

    #[test]
    fn flip_is_an_involution(bits in any::<u64>()) {
        let board = Bitboard::new(bits);
        prop_assert_eq!(flip(flip(board)), board);
    }

    #[test]
    fn rotation_preserves_occupancy_count(bits in any::<u64>(), rotation in arb_rotation()) {
        let board = Bitboard::new(bits);
        prop_assert_eq!(rotate(board, rotation).count(), board.count());
    }

    /// Folding the flip into the scan gives the same normalized board as
    /// flipping after the filter.
    #[test]
    fn scan_flip_matches_transform_flip(bits in any::<u64>(), rotation in arb_rotation()) {
        let orientation = Orientation::new(rotation, true);

        let mut folded = ScanBuilder::new(true);
        let mut plain = ScanBuilder::new(false);
        for index in 0..64u8 {
            let occupied = (bits >> index) & 1 == 1;
            folded.write(index, occupied);
            plain.write(index, occupied);
        }

        let via_scan = orientation.without_flip().normalize(folded.finish());
        let via_transform = orientation.normalize(plain.finish());
        prop_assert_eq!(via_scan, via_transform);
    }

    #[test]
    fn scan_rows_match_transform_flip(rows in any::<[u8; 8]>(), rotation in arb_rotation()) {
        let orientation = Orientation::new(rotation, true);

        let mut folded = ScanBuilder::new(true);
        let mut plain = ScanBuilder::new(false);
        for (row, byte) in rows.iter().enumerate() {
            folded.set_row(row as u8, *byte);
            plain.set_row(row as u8, *byte);
        }

        prop_assert_eq!(plain.finish(), Bitboard::from_le_bytes(rows));
        prop_assert_eq!(
            orientation.without_flip().normalize(folded.finish()),
            orientation.normalize(plain.finish())
        );
    }
}

#[test]
fn a8_rotated_quarter_turn_lands_on_bit_7() {
    let orientation = Orientation::new(Rotation::Deg90, false);
    let normalized = orientation.normalize(Bitboard::new(1));
    assert_eq!(normalized.count(), 1);
    assert_eq!(normalized.squares().next().map(|s| s.index()), Some(7));
}
