//! Register addresses and decoding

/// Default 7-bit bus address of the board
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// First board byte register
pub const BOARD_BASE: u8 = 0x90;

/// Number of board byte registers
pub const BOARD_LEN: u8 = 8;

/// Pending-change flag register (one below the board bytes)
pub const CHANGE_FLAG: u8 = BOARD_BASE - 1;

/// What a register address refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Pending-change flag; reading it clears the flag
    ChangeFlag,
    /// Board byte `n` (0..8), little-endian
    BoardByte(u8),
    /// Outside the map; reads as 0
    Unmapped,
}

impl Register {
    /// Decode a pointer value
    pub const fn decode(address: u8) -> Self {
        if address == CHANGE_FLAG {
            Register::ChangeFlag
        } else if address >= BOARD_BASE && address < BOARD_BASE + BOARD_LEN {
            Register::BoardByte(address - BOARD_BASE)
        } else {
            Register::Unmapped
        }
    }

    /// Address of this register, if it is mapped
    pub const fn address(self) -> Option<u8> {
        match self {
            Register::ChangeFlag => Some(CHANGE_FLAG),
            Register::BoardByte(n) if n < BOARD_LEN => Some(BOARD_BASE + n),
            _ => None,
        }
    }
}

/// Event delivered by the bus target transport
///
/// The transport produces these asynchronously whenever the master
/// addresses the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetEvent {
    /// The master wrote a byte: it becomes the register pointer
    AddressSelect(u8),
    /// The master wants one byte from the current pointer
    DataRequest,
}
