//! Chessboard Register Protocol
//!
//! This crate defines the I2C register map between the board (bus target)
//! and its controller (bus master, e.g. a single-board computer running a
//! chess engine).
//!
//! # Protocol Overview
//!
//! Every transaction is a two-step register access: the master writes one
//! byte that becomes the register pointer, then reads. Each byte read is
//! served from the register the pointer currently addresses.
//!
//! ```text
//!   0x8F          0x90   0x91   ...   0x97
//! ┌────────┐    ┌──────┬──────┬─────┬──────┐
//! │ CHANGE │    │ B0   │ B1   │ ... │ B7   │
//! │ FLAG   │    │ a8-h8│ a7-h7│     │ a1-h1│
//! └────────┘    └──────┴──────┴─────┴──────┘
//! ```
//!
//! Reading the change flag returns 0 or 1 and clears it. The board bytes
//! are the 64-bit occupancy value in little-endian order. Every other
//! address reads as 0.

#![no_std]
#![deny(unsafe_code)]

pub mod registers;

pub use registers::{
    Register, TargetEvent, BOARD_BASE, BOARD_LEN, CHANGE_FLAG, DEFAULT_ADDRESS,
};
