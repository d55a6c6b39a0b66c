//! Bus master side
//!
//! Driver for the controller that polls a board over I2C.

pub mod reader;

pub use reader::{BoardReader, ReaderError};
