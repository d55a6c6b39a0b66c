//! Register file server
//!
//! Protocol state machine for the bus target. The transport turns every
//! master write into [`TargetEvent::AddressSelect`] and every requested
//! byte into [`TargetEvent::DataRequest`]; the register file answers from
//! the shared snapshot at request time, one locked access per byte.

use chessboard_protocol::{Register, TargetEvent};
use embassy_sync::blocking_mutex::raw::RawMutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::snapshot::SharedSnapshot;

/// What happens to the pointer after a data request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointerMode {
    /// Pointer stays put until the master rewrites it
    #[default]
    Fixed,
    /// Pointer advances by one (wrapping) after every data request
    AutoIncrement,
}

/// Bus-facing view of the shared snapshot
pub struct RegisterFile<'a, M: RawMutex> {
    snapshot: &'a SharedSnapshot<M>,
    mode: PointerMode,
    pointer: u8,
}

impl<'a, M: RawMutex> RegisterFile<'a, M> {
    /// New register file with the pointer at 0
    pub const fn new(snapshot: &'a SharedSnapshot<M>, mode: PointerMode) -> Self {
        Self {
            snapshot,
            mode,
            pointer: 0,
        }
    }

    /// Address-select event: store the pointer, nothing else
    pub fn select(&mut self, address: u8) {
        self.pointer = address;
    }

    /// Master write: the first byte selects the register
    ///
    /// Any further bytes are ignored, as is an empty write.
    pub fn write(&mut self, data: &[u8]) {
        if let Some(&address) = data.first() {
            self.select(address);
        }
    }

    /// Data-request event: one byte from the current pointer
    ///
    /// Reading the change flag clears it whatever its value was.
    pub fn read(&mut self) -> u8 {
        let value = match Register::decode(self.pointer) {
            Register::ChangeFlag => u8::from(self.snapshot.take_dirty()),
            Register::BoardByte(n) => self.snapshot.board_byte(n),
            Register::Unmapped => 0,
        };

        if self.mode == PointerMode::AutoIncrement {
            self.pointer = self.pointer.wrapping_add(1);
        }

        value
    }

    /// Take back the last data request, whose byte never reached the master
    ///
    /// An auto-incremented pointer steps back onto that byte, and a set
    /// change flag that was cleared by it is raised again.
    pub fn unread(&mut self, value: u8) {
        if self.mode == PointerMode::AutoIncrement {
            self.pointer = self.pointer.wrapping_sub(1);
        }
        if value != 0 && Register::decode(self.pointer) == Register::ChangeFlag {
            self.snapshot.restore_dirty();
        }
    }

    /// Dispatch a transport event, returning the byte for a data request
    pub fn handle(&mut self, event: TargetEvent) -> Option<u8> {
        match event {
            TargetEvent::AddressSelect(address) => {
                self.select(address);
                None
            }
            TargetEvent::DataRequest => Some(self.read()),
        }
    }

    /// Current pointer value
    pub fn pointer(&self) -> u8 {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::Bitboard;
    use chessboard_protocol::{BOARD_BASE, CHANGE_FLAG};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_board_byte() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(0x0000_0000_AB00_0000));
        let mut regs = RegisterFile::new(&shared, PointerMode::Fixed);

        regs.select(BOARD_BASE + 3);
        assert_eq!(regs.read(), 0xAB);
        // fixed pointer: same byte again
        assert_eq!(regs.read(), 0xAB);
        assert_eq!(regs.pointer(), BOARD_BASE + 3);
    }

    #[test]
    fn test_flag_read_clears() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(1));
        let mut regs = RegisterFile::new(&shared, PointerMode::Fixed);

        regs.select(CHANGE_FLAG);
        assert_eq!(regs.read(), 1);
        assert_eq!(regs.read(), 0);
        assert!(!shared.load().dirty);
    }

    #[test]
    fn test_unmapped_reads_zero() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::FULL);
        let mut regs = RegisterFile::new(&shared, PointerMode::Fixed);

        for address in [0x00, 0x10, CHANGE_FLAG - 1, BOARD_BASE + 8, 0xFF] {
            regs.select(address);
            assert_eq!(regs.read(), 0);
        }
        // unmapped reads leave the flag alone
        assert!(shared.load().dirty);
    }

    #[test]
    fn test_auto_increment_walks_the_map() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(0x0807_0605_0403_0201));
        let mut regs = RegisterFile::new(&shared, PointerMode::AutoIncrement);

        assert_eq!(regs.handle(TargetEvent::AddressSelect(CHANGE_FLAG)), None);
        assert_eq!(regs.handle(TargetEvent::DataRequest), Some(1));
        for expected in 1..=8 {
            assert_eq!(regs.handle(TargetEvent::DataRequest), Some(expected));
        }
        assert_eq!(regs.handle(TargetEvent::DataRequest), Some(0));
    }

    #[test]
    fn test_write_selects_first_byte() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut regs = RegisterFile::new(&shared, PointerMode::Fixed);

        // longer than the transport buffers; the rest is ignored
        let mut long = [0xEE; 12];
        long[0] = BOARD_BASE + 2;
        regs.write(&long);
        assert_eq!(regs.pointer(), BOARD_BASE + 2);

        regs.write(&[]);
        assert_eq!(regs.pointer(), BOARD_BASE + 2);
    }

    #[test]
    fn test_unread_flag_is_raised_again() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(1));
        let mut regs = RegisterFile::new(&shared, PointerMode::Fixed);

        regs.select(CHANGE_FLAG);
        let value = regs.read();
        assert!(!shared.load().dirty);

        regs.unread(value);
        assert!(shared.load().dirty);
        assert_eq!(regs.read(), 1);
    }

    #[test]
    fn test_unread_steps_auto_increment_back() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        shared.publish(Bitboard::new(0x0807_0605_0403_0201));
        let mut regs = RegisterFile::new(&shared, PointerMode::AutoIncrement);
        regs.select(CHANGE_FLAG);

        assert_eq!(regs.read(), 1);
        let value = regs.read();
        assert_eq!(value, 0x01);
        regs.unread(value);

        // a board byte does not touch the flag
        assert_eq!(regs.pointer(), BOARD_BASE);
        assert!(!shared.load().dirty);
        assert_eq!(regs.read(), 0x01);
        assert_eq!(regs.read(), 0x02);
    }

    #[test]
    fn test_unread_clear_flag_stays_clear() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut regs = RegisterFile::new(&shared, PointerMode::AutoIncrement);
        regs.select(CHANGE_FLAG);

        let value = regs.read();
        regs.unread(value);
        assert_eq!(regs.pointer(), CHANGE_FLAG);
        assert!(!shared.load().dirty);
    }

    #[test]
    fn test_auto_increment_wraps() {
        let shared = SharedSnapshot::<NoopRawMutex>::new();
        let mut regs = RegisterFile::new(&shared, PointerMode::AutoIncrement);
        regs.select(0xFF);
        regs.read();
        assert_eq!(regs.pointer(), 0);
    }
}
