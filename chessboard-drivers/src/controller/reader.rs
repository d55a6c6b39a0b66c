//! Board reader
//!
//! Polls a board's register file from the bus master. Every register is
//! fetched with its own write-then-read, so the reader works against a
//! target with either pointer policy.

use chessboard_core::{Bitboard, BoardDiff};
use chessboard_hal::I2cBus;
use chessboard_protocol::{Register, BOARD_LEN, CHANGE_FLAG};

/// Reader error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReaderError<E> {
    /// The bus transaction failed
    Bus(E),
}

/// Controller-side view of one board
pub struct BoardReader<I> {
    bus: I,
    address: u8,
    /// Board as of the last successful read
    state: Bitboard,
}

impl<I: I2cBus> BoardReader<I> {
    /// Reader for the board at 7-bit `address`, starting from an empty board
    pub fn new(bus: I, address: u8) -> Self {
        Self {
            bus,
            address,
            state: Bitboard::EMPTY,
        }
    }

    /// Fetch one register
    pub fn read_register(&mut self, register: u8) -> Result<u8, ReaderError<I::Error>> {
        let mut buf = [0u8; 1];
        self.bus
            .write_read(self.address, &[register], &mut buf)
            .map_err(ReaderError::Bus)?;
        Ok(buf[0])
    }

    /// Read (and thereby clear) the pending-change flag
    pub fn has_changed(&mut self) -> Result<bool, ReaderError<I::Error>> {
        Ok(self.read_register(CHANGE_FLAG)? > 0)
    }

    /// Read all eight board bytes
    pub fn read_board(&mut self) -> Result<Bitboard, ReaderError<I::Error>> {
        let mut bytes = [0u8; BOARD_LEN as usize];
        for (n, byte) in bytes.iter_mut().enumerate() {
            // BoardByte(n) for n < BOARD_LEN always has an address
            if let Some(register) = Register::BoardByte(n as u8).address() {
                *byte = self.read_register(register)?;
            }
        }
        Ok(Bitboard::from_le_bytes(bytes))
    }

    /// Read the board unconditionally and make it the current state
    pub fn sync(&mut self) -> Result<Bitboard, ReaderError<I::Error>> {
        self.state = self.read_board()?;
        Ok(self.state)
    }

    /// Poll the change flag; if set, read the board and report what moved
    ///
    /// Returns `None` when the board reports no change.
    pub fn update(&mut self) -> Result<Option<BoardDiff>, ReaderError<I::Error>> {
        if !self.has_changed()? {
            return Ok(None);
        }
        let board = self.read_board()?;
        let diff = self.state.diff(board);
        self.state = board;
        Ok(Some(diff))
    }

    /// Board as of the last read
    pub fn state(&self) -> Bitboard {
        self.state
    }

    /// Give the bus back
    pub fn release(self) -> I {
        self.bus
    }
}
