//! Hardware driver implementations
//!
//! Concrete implementations of the chessboard-core traits, written against
//! the chessboard-hal pin, analog and bus traits:
//!
//! - Sensor scanners (shift registers, GPIO matrix, multiplexed Hall array)
//! - Controller-side board reader (I2C bus master)

#![no_std]
#![deny(unsafe_code)]

pub mod controller;
pub mod sensor;

pub use controller::{BoardReader, ReaderError};
pub use sensor::{ColumnSense, HallScanner, MatrixScanner, ShiftRegisterScanner};
