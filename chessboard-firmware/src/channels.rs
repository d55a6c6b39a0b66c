//! State shared between Embassy tasks
//!
//! The scan task is the only writer of [`SNAPSHOT`]; the bus task only reads
//! it and clears the change flag. Both go through the snapshot's lock, so a
//! bus read never sees half of a publish.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use chessboard_core::{Bitboard, SharedSnapshot, SimulatedBoard};

/// Published board and pending-change flag
pub static SNAPSHOT: SharedSnapshot<CriticalSectionRawMutex> = SharedSnapshot::new();

/// Board toggled from the console when no sensor is fitted
pub static SIMULATED: SimulatedBoard<CriticalSectionRawMutex> =
    SimulatedBoard::new(Bitboard::EMPTY);

/// Latest published board, for the console to print
pub static BOARD_UPDATE: Signal<CriticalSectionRawMutex, Bitboard> = Signal::new();
